use crate::*;
use ossync::error::Result;
use ossync::storage::TransferManager;
use ossync::storage::types::RemoteObjectDescriptor;
use tokio::fs;

pub fn tests(manager: &TransferManager, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        manager,
        test_download_to_creates_directories,
        test_download_to_extensionless_target,
        test_download_to_skips_missing_object,
        test_download_to_skips_unreachable_host,
        test_download_content_attaches_bytes,
        test_download_content_not_found,
        test_public_url_composition
    ));
}

fn mirrored(manager: TransferManager) -> TransferManager<MirrorFetcher> {
    let fetcher = MirrorFetcher::new(manager.operator().clone());
    manager.with_fetcher(fetcher)
}

async fn test_download_to_creates_directories(manager: TransferManager) -> Result<()> {
    let key = format!("site/{}/assets/logo.svg", TEST_FIXTURE.new_segment());
    let content = TEST_FIXTURE.new_content(1..8192);
    manager.put_buffer(&key, Some(content.clone())).await?;
    let manager = mirrored(manager);

    let local = TEST_FIXTURE
        .new_local_dir()
        .join("deep")
        .join("nested")
        .join("logo.svg");
    let object = manager.object_for_key(&key);

    assert!(manager.download_to(&object, &local).await);

    let written = fs::read(&local).await?;
    assert_eq!(written, content);
    Ok(())
}

async fn test_download_to_extensionless_target(manager: TransferManager) -> Result<()> {
    let key = format!("site/{}/LICENSE", TEST_FIXTURE.new_segment());
    manager.put_string(&key, "MIT").await?;
    let manager = mirrored(manager);

    let local = TEST_FIXTURE.new_local_dir().join("nested").join("LICENSE");

    assert!(manager.download_to(&manager.object_for_key(&key), &local).await);

    assert!(local.is_file());
    assert_eq!(fs::read(&local).await?, b"MIT");
    Ok(())
}

async fn test_download_to_skips_missing_object(manager: TransferManager) -> Result<()> {
    let manager = mirrored(manager);
    let key = format!("site/{}/missing.txt", TEST_FIXTURE.new_segment());
    let local = TEST_FIXTURE.new_local_dir().join("out").join("missing.txt");

    assert!(!manager.download_to(&manager.object_for_key(&key), &local).await);

    assert!(!local.exists());
    assert!(!local.parent().unwrap().exists());
    Ok(())
}

async fn test_download_to_skips_unreachable_host(manager: TransferManager) -> Result<()> {
    let manager = mirrored(manager);
    let object = RemoteObjectDescriptor::new("x", "https://elsewhere.invalid/x", 0);
    let local = TEST_FIXTURE.new_local_dir().join("x.bin");

    assert!(!manager.download_to(&object, &local).await);
    assert!(!local.exists());
    Ok(())
}

async fn test_download_content_attaches_bytes(manager: TransferManager) -> Result<()> {
    let key = format!("site/{}/data.json", TEST_FIXTURE.new_segment());
    manager.put_string(&key, r#"{"ok":true}"#).await?;
    let manager = mirrored(manager);

    let object = manager
        .download_content(manager.object_for_key(&key))
        .await
        .expect("object should be fetched");

    assert_eq!(object.name, key);
    assert_eq!(object.content.as_deref(), Some(br#"{"ok":true}"#.as_slice()));
    Ok(())
}

async fn test_download_content_not_found(manager: TransferManager) -> Result<()> {
    let manager = mirrored(manager);
    let object = RemoteObjectDescriptor::new(
        "y.txt",
        format!("{TEST_ACCESS_DOMAIN}/site/{}/y.txt", TEST_FIXTURE.new_segment()),
        0,
    );

    assert!(manager.download_content(object).await.is_none());
    Ok(())
}

async fn test_public_url_composition(manager: TransferManager) -> Result<()> {
    assert_eq!(
        manager.remote_key_to_public_url("/img/a.png"),
        "https://cdn.example.com/site/img/a.png"
    );
    assert_eq!(manager.base_url(), "https://cdn.example.com/site");
    assert_eq!(
        manager.object_for_key("site/img/a.png").url,
        "https://cdn.example.com/site/img/a.png"
    );
    Ok(())
}
