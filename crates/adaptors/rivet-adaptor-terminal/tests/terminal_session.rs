//! Scripted terminal sessions against a mock backend

use rivet_adaptor_terminal::{Tab, TerminalApp, UiOptions};
use rivet_core::{BackendApi, ClientConfig, HttpBackend, SessionState, SAVED_NOTICE};
use rivet_provider_voice::{AudioPlayer, OpenAIVoiceEngine, VoiceBridge};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> Arc<dyn BackendApi> {
    let config = ClientConfig::default().with_backend_url(&server.uri()).unwrap();
    Arc::new(HttpBackend::new(&config).unwrap())
}

async fn mount_options(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "options": {
                "humans": ["h1", "h2"], "personas": ["p1"], "prompts": ["pr1"],
                "tools": ["t1"], "gptmodels": ["g1", "gpt-4-1106-preview"]
            }
        })))
        .mount(server)
        .await;
}

async fn mount_chat(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/configs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"configs": ["test"]})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({"name": "test", "start": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "inner_monologue": "thinking",
            "message": "hello"
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({"name": "test", "start": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "fine, thanks"
        })))
        .mount(server)
        .await;
}

async fn run_script<'a>(
    options: UiOptions,
    backend: Arc<dyn BackendApi>,
    script: &'a str,
) -> (TerminalApp<&'a [u8], Vec<u8>>, String) {
    let mut app = TerminalApp::new(options, backend, script.as_bytes(), Vec::new());
    app.run().await.unwrap();
    let output = String::from_utf8(app.output().clone()).unwrap();
    (app, output)
}

#[tokio::test]
async fn test_create_form_saves_with_defaults() {
    let server = MockServer::start().await;
    mount_options(&server).await;
    Mock::given(method("POST"))
        .and(path("/save"))
        .and(body_json(json!({
            "name": "test",
            "human": "h2",
            "persona": "p1",
            "prompt": "pr1",
            "tool": "t1",
            "gptmodel": "gpt-4-1106-preview"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let options = UiOptions::default();
    let mut app = TerminalApp::new(
        options,
        backend_for(&server),
        "/create\nTest\n2\n\n\n\n\n/quit\n".as_bytes(),
        Vec::new(),
    )
    .with_preferred_model("gpt-4-1106-preview");
    app.run().await.unwrap();
    let output = String::from_utf8(app.output().clone()).unwrap();

    assert_eq!(app.tab(), Tab::CreateConfiguration);
    assert!(output.contains("Welcome to Rivet-MemGPT"));
    assert!(output.contains(&format!("✓ {}", SAVED_NOTICE)));
}

#[tokio::test]
async fn test_invalid_name_and_choice_are_asked_again() {
    let server = MockServer::start().await;
    mount_options(&server).await;
    Mock::given(method("POST"))
        .and(path("/save"))
        .and(body_partial_json(json!({"name": "good", "human": "h1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let (_, output) = run_script(
        UiOptions::default(),
        backend_for(&server),
        "/create\nbad name!\ngood\n7\nnobody\n\n\n\n\n\n",
    )
    .await;

    assert!(output.contains("do not use special characters"));
    assert!(output.contains("has no choice number 7"));
    assert!(output.contains("'nobody' is not a valid Human choice"));
    assert!(output.contains(SAVED_NOTICE));
}

#[tokio::test]
async fn test_choice_zero_is_rejected() {
    let server = MockServer::start().await;
    mount_options(&server).await;
    Mock::given(method("POST"))
        .and(path("/save"))
        .and(body_partial_json(json!({"name": "zero", "human": "h2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let (_, output) = run_script(
        UiOptions::default(),
        backend_for(&server),
        "/create\nzero\n0\n2\n\n\n\n\n",
    )
    .await;

    assert!(output.contains("Human has no choice number 0"));
    assert!(output.contains(SAVED_NOTICE));
}

#[tokio::test]
async fn test_save_rejection_is_shown_verbatim() {
    let server = MockServer::start().await;
    mount_options(&server).await;
    Mock::given(method("POST"))
        .and(path("/save"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Configuration test already exists"})),
        )
        .mount(&server)
        .await;

    let (_, output) = run_script(
        UiOptions::default(),
        backend_for(&server),
        "/create\ntest\n\n\n\n\n\n",
    )
    .await;

    assert!(output.contains("⚠️  Configuration test already exists"));
    assert!(!output.contains(SAVED_NOTICE));
}

#[tokio::test]
async fn test_options_failure_disables_form() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/options"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/save"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (_, output) = run_script(
        UiOptions::default(),
        backend_for(&server),
        "/create\nname\n",
    )
    .await;

    assert!(output.contains("the form is disabled"));
}

#[tokio::test]
async fn test_auto_launch_chat_flow() {
    let server = MockServer::start().await;
    mount_chat(&server).await;

    let options = UiOptions {
        voice_enabled: false,
        auto_launch: true,
    };
    let (app, output) = run_script(
        options,
        backend_for(&server),
        "/start\nhow are you?\n/history\n/quit\n",
    )
    .await;

    assert_eq!(app.tab(), Tab::StartChatting);
    assert_eq!(app.configurations(), ["test".to_string()]);
    assert!(output.contains("== Start chatting == [available: /start]"));
    assert!(output.contains("**Assistant** *(thinking)*\nhello\n"));
    assert!(output.contains("**You**\nhow are you?\n**Assistant**\nfine, thanks\n"));

    let transcript = app.session().transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript.turns()[0].user_message, None);
    assert_eq!(app.session().state(), SessionState::Started);
}

#[tokio::test]
async fn test_second_start_sends_nothing() {
    let server = MockServer::start().await;
    mount_chat(&server).await;

    let (app, output) = run_script(
        UiOptions::default(),
        backend_for(&server),
        "/tab chat\n/start test\n/start test\n",
    )
    .await;

    assert!(output.contains("already started"));
    assert_eq!(app.session().transcript().len(), 1);
}

#[tokio::test]
async fn test_message_before_start_is_refused() {
    let server = MockServer::start().await;
    mount_options(&server).await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (app, output) = run_script(UiOptions::default(), backend_for(&server), "hello?\n").await;

    assert!(output.contains("Start a conversation first"));
    assert_eq!(app.session().state(), SessionState::NotStarted);
}

#[tokio::test]
async fn test_failed_start_leaves_session_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/configs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"configs": ["test"]})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "error", "message": "agent not loaded"})),
        )
        .mount(&server)
        .await;

    let options = UiOptions {
        voice_enabled: false,
        auto_launch: true,
    };
    let (app, output) = run_script(options, backend_for(&server), "/start\n").await;

    assert!(output.contains("⚠️  agent not loaded"));
    assert_eq!(app.session().state(), SessionState::NotStarted);
    assert!(app.session().transcript().is_empty());
}

#[tokio::test]
async fn test_empty_configuration_list_shows_hint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/configs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"configs": []})))
        .mount(&server)
        .await;

    let options = UiOptions {
        voice_enabled: false,
        auto_launch: true,
    };
    let (app, output) = run_script(options, backend_for(&server), "/start\n").await;

    assert!(output.contains("create a new configuration first"));
    assert!(!app.controls().start);
}

#[tokio::test]
async fn test_clear_keeps_session_and_reset_ends_it() {
    let server = MockServer::start().await;
    mount_chat(&server).await;

    let options = UiOptions {
        voice_enabled: false,
        auto_launch: true,
    };
    let (app, output) = run_script(
        options,
        backend_for(&server),
        "/start\n/clear\n/history\nstill there?\n/reset\n",
    )
    .await;

    assert!(output.contains("✓ Chat cleared"));
    assert!(output.contains("(no messages)"));
    assert!(output.contains("fine, thanks"));
    assert!(output.contains("✓ Conversation reset"));
    assert_eq!(app.session().state(), SessionState::NotStarted);
    assert!(app.session().transcript().is_empty());
}

#[tokio::test]
async fn test_voice_disabled() {
    let server = MockServer::start().await;
    mount_options(&server).await;

    let (_, output) = run_script(
        UiOptions::default(),
        backend_for(&server),
        "/voice clip.wav\n",
    )
    .await;

    assert!(output.contains("Voice is disabled"));
}

#[tokio::test]
async fn test_voice_round_trip() {
    let server = MockServer::start().await;
    mount_chat(&server).await;

    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": " how are you? "})))
        .expect(1)
        .mount(&openai)
        .await;
    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xFB, 0x90]))
        .expect(2)
        .mount(&openai)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("clip.wav");
    std::fs::write(&clip, b"RIFF....WAVE").unwrap();
    let reply_audio = dir.path().join("voice.mp3");

    let engine = OpenAIVoiceEngine::new(Some("test-key".to_string())).with_base_url(openai.uri());
    let bridge = VoiceBridge::with_openai(engine, &reply_audio, AudioPlayer::new(None));

    let options = UiOptions {
        voice_enabled: true,
        auto_launch: true,
    };
    let script = format!("/start\n/voice {}\n", clip.display());
    let mut app = TerminalApp::new(options, backend_for(&server), script.as_bytes(), Vec::new())
        .with_voice(bridge);
    app.run().await.unwrap();
    let output = String::from_utf8(app.output().clone()).unwrap();

    assert!(output.contains("🎤 how are you?"));
    assert!(output.contains("fine, thanks"));
    assert_eq!(std::fs::read(&reply_audio).unwrap(), vec![0xFF, 0xFB, 0x90]);
    assert_eq!(app.session().transcript().len(), 2);
}

#[tokio::test]
async fn test_numeric_configuration_name_wins_over_position() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/configs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"configs": ["2", "other"]})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({"name": "2", "start": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "hello"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = UiOptions {
        voice_enabled: false,
        auto_launch: true,
    };
    let (app, _) = run_script(options, backend_for(&server), "/start 2\n").await;

    assert_eq!(app.session().configuration(), Some("2"));
    assert_eq!(app.session().state(), SessionState::Started);
}

#[tokio::test]
async fn test_position_selects_when_no_name_matches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/configs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"configs": ["alpha", "beta"]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({"name": "beta", "start": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "hello"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = UiOptions {
        voice_enabled: false,
        auto_launch: true,
    };
    let (app, _) = run_script(options, backend_for(&server), "/start 2\n").await;

    assert_eq!(app.session().configuration(), Some("beta"));
}
