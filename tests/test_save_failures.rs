mod project_service_mock;

use blueprint_session::domain::graph::templates::NodeKind;
use blueprint_session::domain::session::command::{CommandOutcome, EditorCommand};
use blueprint_session::domain::utils::id::FileId;
use blueprint_session::error::Error;

use project_service_mock::{MockProjectService, session_on};

#[tokio::test]
async fn test_failed_save_keeps_local_state() {
    let service = MockProjectService::new();
    let project_id = service.seed_blueprints(&["blueprint-1"]).await;
    let file_id = FileId::new("blueprint-1");

    let mut session = session_on(&service, &project_id).await;
    session.open_project_file(&file_id).unwrap();
    let node_id = session.add_node(NodeKind::Event, None).unwrap();

    service.set_fail_updates(true);
    let result = session.save(&file_id).await;

    match result {
        Err(error) => {
            assert!(error.is_persistence_failure());
            assert!(matches!(error, Error::ApiError { status: 503, .. }));
        }
        Ok(_) => panic!("save should fail while the service is down"),
    }
    assert!(session.is_dirty(&file_id));
    assert!(session.canvas().unwrap().snapshot.contains_node(&node_id));
    assert!(session.file(&file_id).unwrap().content.is_none());
    assert!(service.content_of(&project_id, "blueprint-1").await.is_none());

    // No automatic retry; the next explicit save goes through.
    service.set_fail_updates(false);
    session.save(&file_id).await.unwrap();
    assert!(!session.is_dirty(&file_id));
    assert_eq!(service.update_calls(), 2);
}

#[tokio::test]
async fn test_save_all_reports_each_failure() {
    let service = MockProjectService::new();
    let project_id = service.seed_blueprints(&["a", "b"]).await;

    let mut session = session_on(&service, &project_id).await;
    for file in ["a", "b"] {
        session.open_project_file(&FileId::new(file)).unwrap();
        session.add_node(NodeKind::Function, None).unwrap();
    }

    service.set_fail_updates(true);
    let outcome = session.dispatch(EditorCommand::SaveAll).await.unwrap();

    let CommandOutcome::Saved { saved, failed } = outcome else {
        panic!("expected a save outcome");
    };
    assert!(saved.is_empty());
    assert_eq!(failed.len(), 2);
    assert!(failed.iter().all(|(_, error)| error.is_persistence_failure()));
    assert!(session.is_dirty(&FileId::new("a")));
    assert!(session.is_dirty(&FileId::new("b")));
}
