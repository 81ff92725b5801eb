use crate::*;
use ossync::error::{Error, Result};
use ossync::storage::TransferManager;
use ossync::storage::utils::walk::{FileDescriptor, walk};

pub fn tests(manager: &TransferManager, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        manager,
        test_batch_upload_keys_by_filename,
        test_batch_upload_strips_prefix,
        test_batch_upload_settles_all_on_failure,
        test_upload_dir_relative_to_root,
        test_put_stream_missing_file,
        test_put_buffer_rejects_empty_arguments,
        test_put_string_stores_utf8,
        test_put_string_empty_stores_zero_bytes
    ));
}

async fn test_batch_upload_keys_by_filename(manager: TransferManager) -> Result<()> {
    let dir = TEST_FIXTURE.new_local_dir();
    let filename = format!("{}.txt", TEST_FIXTURE.new_segment());
    let content = TEST_FIXTURE.new_content(1..4096);
    let path = TEST_FIXTURE.write_local(&dir.join("a"), &filename, &content);

    let outcomes = manager
        .batch_upload(&[FileDescriptor::new(&path)], "")
        .await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].key, format!("site/{filename}"));
    let receipt = outcomes[0].result.as_ref().expect("upload should succeed");
    assert_eq!(receipt.size, content.len() as u64);

    let stored = manager.operator().read(&outcomes[0].key).await?;
    assert_eq!(stored.to_vec(), content);
    Ok(())
}

async fn test_batch_upload_strips_prefix(manager: TransferManager) -> Result<()> {
    let dir = TEST_FIXTURE.new_local_dir();
    let segment = TEST_FIXTURE.new_segment();
    TEST_FIXTURE.write_local(&dir, &format!("{segment}/index.html"), b"<html></html>");
    TEST_FIXTURE.write_local(&dir, &format!("{segment}/css/app.css"), b"body{}");
    TEST_FIXTURE.write_local(&dir, &format!("{segment}/css/vendor/reset.css"), b"*{}");

    let files = walk(&dir)?;
    let outcomes = manager
        .batch_upload(&files, &dir.to_string_lossy())
        .await;

    let mut keys: Vec<_> = outcomes.iter().map(|o| o.key.clone()).collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            format!("site/{segment}/css/app.css"),
            format!("site/{segment}/css/vendor/reset.css"),
            format!("site/{segment}/index.html"),
        ]
    );
    assert!(outcomes.iter().all(|o| o.is_success()));

    let stored = manager
        .operator()
        .read(&format!("site/{segment}/css/app.css"))
        .await?;
    assert_eq!(stored.to_vec(), b"body{}");
    Ok(())
}

async fn test_batch_upload_settles_all_on_failure(manager: TransferManager) -> Result<()> {
    let dir = TEST_FIXTURE.new_local_dir();
    let segment = TEST_FIXTURE.new_segment();
    let missing = dir.join(&segment).join("missing.txt");
    let present = TEST_FIXTURE.write_local(&dir, &format!("{segment}/present.txt"), b"ok");

    let files = vec![FileDescriptor::new(&missing), FileDescriptor::new(&present)];
    let outcomes = manager
        .batch_upload(&files, &dir.to_string_lossy())
        .await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].file.path, missing);
    assert!(matches!(
        outcomes[0].result,
        Err(Error::UploadFailed { .. })
    ));
    assert!(outcomes[1].is_success());

    let stored = manager
        .operator()
        .read(&format!("site/{segment}/present.txt"))
        .await?;
    assert_eq!(stored.to_vec(), b"ok");
    Ok(())
}

async fn test_upload_dir_relative_to_root(manager: TransferManager) -> Result<()> {
    let dir = TEST_FIXTURE.new_local_dir();
    let segment = TEST_FIXTURE.new_segment();
    let root = dir.join(&segment);
    TEST_FIXTURE.write_local(&root, "img/logo.png", b"png");

    let outcomes = manager.upload_dir(&root, None).await?;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].key, "site/img/logo.png");
    assert!(outcomes[0].is_success());

    let stat = manager.operator().stat("site/img/logo.png").await?;
    assert_eq!(stat.content_length(), 3);
    manager.delete_object("site/img/logo.png").await?;
    Ok(())
}

async fn test_put_stream_missing_file(manager: TransferManager) -> Result<()> {
    let dir = TEST_FIXTURE.new_local_dir();
    let key = format!("site/{}/nothing.txt", TEST_FIXTURE.new_segment());

    let result = manager.put_stream(dir.join("nothing.txt"), &key).await;

    assert!(matches!(result, Err(Error::UploadFailed { .. })));
    assert!(!manager.operator().exists(&key).await?);
    Ok(())
}

async fn test_put_buffer_rejects_empty_arguments(manager: TransferManager) -> Result<()> {
    let result = manager.put_buffer("site/x.txt", None).await;
    assert!(matches!(
        result,
        Err(Error::InvalidUploadArgument { argument: "buffer" })
    ));

    let result = manager.put_buffer("", Some(b"data".to_vec())).await;
    assert!(matches!(
        result,
        Err(Error::InvalidUploadArgument { argument: "key" })
    ));
    Ok(())
}

async fn test_put_string_stores_utf8(manager: TransferManager) -> Result<()> {
    let key = format!("site/{}/greeting.txt", TEST_FIXTURE.new_segment());
    let text = "héllo, wörld";

    let receipt = manager.put_string(&key, text).await?;

    assert_eq!(receipt.key, key);
    assert_eq!(receipt.size, text.len() as u64);
    let stored = manager.operator().read(&key).await?;
    assert_eq!(stored.to_vec(), text.as_bytes());
    Ok(())
}

async fn test_put_string_empty_stores_zero_bytes(manager: TransferManager) -> Result<()> {
    let key = format!("site/{}/empty.txt", TEST_FIXTURE.new_segment());

    let receipt = manager.put_string(&key, "").await?;

    assert_eq!(receipt.size, 0);
    let meta = manager.operator().stat(&key).await?;
    assert_eq!(meta.content_length(), 0);
    assert!(manager.operator().read(&key).await?.is_empty());
    Ok(())
}
