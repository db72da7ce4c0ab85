mod common;

use common::{sample_tree, BOX_ID};
use doc_context_core::{
    ActiveDocumentProvider, Command, CommandDispatcher, CommandError, CommandOutput, CreateError,
    FixedActiveDocument, NavigationOutcome, OutlineNode, Placement, PluginSettings, RecordingHost,
    TabSession,
};
use std::time::Duration;

fn heading(id: &str, name: &str, children: Vec<OutlineNode>) -> OutlineNode {
    OutlineNode {
        depth: 0,
        name: name.to_string(),
        id: id.to_string(),
        children,
    }
}

#[tokio::test]
async fn activation_registers_commands_from_settings() {
    let settings = PluginSettings {
        enable_sibling_shortcuts: false,
        ..PluginSettings::default()
    };
    let mut dispatcher = CommandDispatcher::activate_with_store(sample_tree(), settings)
        .await
        .unwrap();

    let keys: Vec<&str> = dispatcher
        .registry()
        .list()
        .into_iter()
        .map(|spec| spec.key.as_str())
        .collect();
    assert_eq!(
        keys,
        [
            Command::GoToChild.key(),
            Command::GoToParent.key(),
            Command::ShowContext.key(),
        ]
    );

    let session = TabSession::with_document("n3");
    let err = dispatcher
        .dispatch(Command::NextSibling, &session, &session)
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::Disabled(key) if key == Command::NextSibling.key()));
    assert_eq!(session.tabs(), ["n3"]);

    dispatcher
        .apply_settings(PluginSettings::default())
        .unwrap();
    let output = dispatcher
        .dispatch(Command::NextSibling, &session, &session)
        .await
        .unwrap();
    assert!(matches!(
        output,
        CommandOutput::Navigation(NavigationOutcome::Opened { ref target, .. }) if target == "z"
    ));
}

#[tokio::test]
async fn show_context_uses_notebook_directory() {
    let mut dispatcher =
        CommandDispatcher::activate_with_store(sample_tree(), PluginSettings::default())
            .await
            .unwrap();
    let session = TabSession::with_document("n3");

    let output = dispatcher
        .dispatch(Command::ShowContext, &session, &session)
        .await
        .unwrap();
    let CommandOutput::Context(context) = output else {
        panic!("expected context output");
    };
    assert_eq!(context.notebook_name, "Journal");
    assert_eq!(context.document.id, "n3");
}

#[tokio::test]
async fn show_context_without_active_document() {
    let mut dispatcher =
        CommandDispatcher::activate_with_store(sample_tree(), PluginSettings::default())
            .await
            .unwrap();
    let host = RecordingHost::new();

    let output = dispatcher
        .dispatch(Command::ShowContext, &FixedActiveDocument::new(None), &host)
        .await
        .unwrap();
    assert_eq!(output, CommandOutput::NoActiveDocument);
}

#[tokio::test]
async fn outline_is_fetched_for_active_document() {
    let store = sample_tree();
    store.set_outline(
        "n3",
        vec![heading("h1", "Intro", vec![heading("h2", "Detail", vec![])])],
    );
    let dispatcher =
        CommandDispatcher::activate_with_store(store.clone(), PluginSettings::default())
            .await
            .unwrap();

    let output = dispatcher
        .outline(&FixedActiveDocument::new(Some("n3".to_string())))
        .await
        .unwrap();
    let CommandOutput::Outline(outline) = output else {
        panic!("expected outline output");
    };
    assert_eq!(outline.len(), 1);
    assert_eq!(outline[0].children[0].name, "Detail");

    let output = dispatcher
        .outline(&FixedActiveDocument::new(Some("a".to_string())))
        .await
        .unwrap();
    assert_eq!(output, CommandOutput::Outline(Vec::new()));
}

#[tokio::test]
async fn focus_reveals_active_document() {
    let dispatcher =
        CommandDispatcher::activate_with_store(sample_tree(), PluginSettings::default())
            .await
            .unwrap();
    let session = TabSession::with_document("n2");

    let output = dispatcher.focus_in_file_tree(&session, &session);
    assert_eq!(output, CommandOutput::Focused("n2".to_string()));
    assert_eq!(session.focused_in_tree().as_deref(), Some("n2"));
}

#[tokio::test]
async fn create_sibling_and_child_use_derived_paths_and_open_them() {
    let store = sample_tree();
    let dispatcher =
        CommandDispatcher::activate_with_store(store.clone(), PluginSettings::default())
            .await
            .unwrap();
    let session = TabSession::with_document("n3");

    let output = dispatcher
        .create_document(&session, &session, Placement::Sibling, "Draft")
        .await
        .unwrap();
    let CommandOutput::Created(created) = output else {
        panic!("expected created document");
    };
    assert_eq!(created.hpath, "/Title1/Title2/Draft");
    assert_eq!(session.active_document(), Some(created.id.clone()));

    dispatcher
        .create_document(
            &FixedActiveDocument::new(Some("n3".to_string())),
            &session,
            Placement::Child,
            "Notes",
        )
        .await
        .unwrap();

    let created = store.created();
    assert_eq!(created.len(), 2);
    assert_eq!(
        created[1],
        (
            BOX_ID.to_string(),
            "/Title1/Title2/Title3/Notes".to_string(),
            String::new()
        )
    );

    let err = dispatcher
        .create_document(&session, &session, Placement::Child, " ")
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::Create(CreateError::InvalidTitle(_))));
}

#[tokio::test]
async fn apply_settings_updates_throttle() {
    let mut dispatcher =
        CommandDispatcher::activate_with_store(sample_tree(), PluginSettings::default())
            .await
            .unwrap();
    assert!(dispatcher.throttle().is_enabled());

    dispatcher
        .apply_settings(PluginSettings {
            enable_tab_throttle: false,
            tab_throttle_window_ms: 250,
            ..PluginSettings::default()
        })
        .unwrap();
    assert!(!dispatcher.throttle().is_enabled());
    assert_eq!(dispatcher.throttle().window(), Duration::from_millis(250));
    assert!(!dispatcher.settings().enable_tab_throttle);
    dispatcher.deactivate();
}
