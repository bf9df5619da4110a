//! Integration tests for the docqa CLI library

use docqa_cli::{
    dry_run, execute, formatter, provider, read_document, CliError, CliFormat, Config,
};
use docqa_domain::LlmUsage;
use docqa_llm::{LlmError, MockProvider};
use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
[provider]
model = "gpt-4o-mini"

[extractor]
max_text_length = 500

[questions.author]
question = "Who is the author of this document?"
allowed_type_keys = ["name"]

[questions.written]
question = "When was this document written?"
allowed_type_keys = ["date"]
"#;

const DOCUMENT: &str = "Sketch of the Analytical Engine, with notes by Ada Lovelace, 1843.";

/// Helper to write a config file and load it back
fn load_config(contents: &str) -> Config {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    Config::from_file(file.path()).unwrap()
}

#[test]
fn test_execute_outputs_encoded_answers() {
    let config = load_config(CONFIG);
    let provider = MockProvider::new(
        r#"{
            "author": [{"answer_type": "name", "first_name": "Ada ", "last_name": "Lovelace"}],
            "written": [{"answer_type": "date", "year": 1843, "month": 1, "day": 1}]
        }"#,
    )
    .with_usage(LlmUsage {
        prompt_tokens: 300,
        completion_tokens: 40,
        total_tokens: 340,
    });

    let output = execute(&config, provider, DOCUMENT, &formatter(CliFormat::Json)).unwrap();
    let value: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["answers"]["author"][0]["type"], "name");
    assert_eq!(value["answers"]["author"][0]["content"]["first_name"], "Ada");
    assert_eq!(value["answers"]["written"][0]["content"]["date"], "1843-01-01");
    assert_eq!(
        value["answers"]["written"][0]["attributes"]["localised_range"]["start"],
        -1
    );
    assert_eq!(value["usage"]["total_tokens"], 340);
}

#[test]
fn test_execute_sends_document_as_user_prompt() {
    let config = load_config(CONFIG);
    let provider = MockProvider::new(r#"{"author": [], "written": []}"#);
    let recorder = provider.clone();

    execute(&config, provider, DOCUMENT, &formatter(CliFormat::Json)).unwrap();

    let request = recorder.last_request().unwrap();
    assert_eq!(request.user_prompt, DOCUMENT);
    assert!(request.system_prompt.contains("## `author`"));
    assert_eq!(request.schema["required"], serde_json::json!(["author", "written"]));
}

#[test]
fn test_execute_reports_extraction_failure() {
    let config = load_config(CONFIG);
    let usage = LlmUsage {
        prompt_tokens: 250,
        completion_tokens: 12,
        total_tokens: 262,
    };
    let provider =
        MockProvider::new(r#"{"author": [{"answer_type": "bogus"}]}"#).with_usage(usage);

    let result = execute(&config, provider, DOCUMENT, &formatter(CliFormat::Json));
    match result {
        Err(CliError::Extraction(failure)) => {
            assert!(failure.to_string().contains("bogus"));
            assert_eq!(failure.usage, Some(usage));
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_execute_rejects_long_document() {
    let config = load_config(CONFIG);
    let provider = MockProvider::default();
    let recorder = provider.clone();

    let result = execute(&config, provider, &"x".repeat(501), &formatter(CliFormat::Json));
    assert!(matches!(result, Err(CliError::Extraction(_))));
    assert_eq!(recorder.call_count(), 0);
}

#[test]
fn test_dry_run_renders_prompt_and_schema() {
    let config = load_config(CONFIG);

    let output = dry_run(&config, &formatter(CliFormat::Json)).unwrap();
    let value: Value = serde_json::from_str(&output).unwrap();

    let prompt = value["system_prompt"].as_str().unwrap();
    assert!(prompt.starts_with("# Role & Task\n- You are a state-of-the-art data extraction AI."));
    assert!(prompt.contains("- Allowed response types: date."));
    assert_eq!(
        value["schema"]["properties"]["author"]["items"]["anyOf"][0]["$ref"],
        "#/definitions/name"
    );
}

#[test]
fn test_dry_run_rejects_unknown_type_keys() {
    let config = load_config(&CONFIG.replace(r#"["date"]"#, r#"["timestamp"]"#));

    let result = dry_run(&config, &formatter(CliFormat::Pretty));
    assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("timestamp")));
}

#[test]
fn test_read_document_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(DOCUMENT.as_bytes()).unwrap();

    assert_eq!(read_document(Some(file.path())).unwrap(), DOCUMENT);
}

#[test]
fn test_read_missing_document() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_document(Some(dir.path().join("absent.txt").as_path()));
    assert!(matches!(result, Err(CliError::Io(_))));
}

#[test]
fn test_provider_setup_errors() {
    let mut config = load_config(CONFIG);
    assert!(provider(&config, "sk-test".to_string()).is_ok());

    config.provider.base_url = "ftp://example.com".to_string();
    let result = provider(&config, "sk-test".to_string());
    assert!(matches!(result, Err(CliError::Provider(LlmError::Config(_)))));
}
