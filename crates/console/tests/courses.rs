//! Course admin search box.

mod common;

use std::time::Duration;

use eduhub_console::workflows::courses::CourseAdmin;

use common::{harness, Backend};

#[tokio::test]
async fn search_box_yields_only_the_settled_query() {
    let h = harness(Backend::default()).await;
    let admin = CourseAdmin::new(h.app.clone());
    let (keys, mut queries) = admin.search_box();

    for prefix in ["r", "ru", "rus", "rust"] {
        keys.send(prefix.to_string()).await.unwrap();
    }

    let settled = tokio::time::timeout(Duration::from_secs(2), queries.recv())
        .await
        .unwrap();
    assert_eq!(settled.as_deref(), Some("rust"));

    drop(keys);
    assert_eq!(queries.recv().await, None);
}
