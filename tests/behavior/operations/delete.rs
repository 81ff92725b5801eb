use crate::*;
use ossync::error::Result;
use ossync::storage::TransferManager;

pub fn tests(manager: &TransferManager, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        manager,
        test_delete_single_object,
        test_delete_non_existent_object,
        test_delete_keeps_siblings
    ));
}

async fn test_delete_single_object(manager: TransferManager) -> Result<()> {
    let key = format!("site/{}/doomed.css", TEST_FIXTURE.new_segment());
    manager.put_string(&key, "a{}").await?;

    manager.delete_object(&key).await?;

    let result = manager.operator().stat(&key).await;
    assert!(
        matches!(result, Err(ref e) if e.kind() == opendal::ErrorKind::NotFound),
        "object should be deleted"
    );
    Ok(())
}

async fn test_delete_non_existent_object(manager: TransferManager) -> Result<()> {
    let key = format!("site/{}/never.txt", TEST_FIXTURE.new_segment());

    // Deleting a missing key is not an error for the store.
    manager.delete_object(&key).await?;

    Ok(())
}

async fn test_delete_keeps_siblings(manager: TransferManager) -> Result<()> {
    let prefix = format!("site/{}/", TEST_FIXTURE.new_segment());
    let first = format!("{prefix}first.txt");
    let second = format!("{prefix}second.txt");
    manager.put_string(&first, "1").await?;
    manager.put_string(&second, "2").await?;

    manager.delete_object(&first).await?;

    let remaining = manager.list_directory(&prefix).await?;
    let names: Vec<_> = remaining.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec![second.as_str()]);
    Ok(())
}
