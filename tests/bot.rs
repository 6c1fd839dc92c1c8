//! End-to-end conversation through a container-wired bot.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::BufReader;
use trekbot::bot::Bot;
use trekbot::config::{BotConfig, Config};
use trekbot::di::Container;
use trekbot::error::AppError;
use trekbot::models::{OutgoingMessage, Update};
use trekbot::services::{CommandService, TRAVEL_OPTIONS};
use trekbot::transport::{console, MessageSink};

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<OutgoingMessage>>,
}

impl RecordingSink {
    fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|message| message.text.clone())
            .collect()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send(&self, message: OutgoingMessage) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

struct ClosedSink;

#[async_trait]
impl MessageSink for ClosedSink {
    async fn send(&self, message: OutgoingMessage) -> Result<(), AppError> {
        Err(AppError::Delivery {
            chat_id: message.chat_id,
            message: "closed".to_string(),
        })
    }
}

/// Fails the first send, then records like `RecordingSink`.
#[derive(Default)]
struct FlakySink {
    inner: RecordingSink,
    failed: Mutex<bool>,
}

#[async_trait]
impl MessageSink for FlakySink {
    async fn send(&self, message: OutgoingMessage) -> Result<(), AppError> {
        {
            let mut failed = self.failed.lock().unwrap();
            if !*failed {
                *failed = true;
                return Err(AppError::Delivery {
                    chat_id: message.chat_id,
                    message: "timeout".to_string(),
                });
            }
        }
        self.inner.send(message).await
    }
}

fn container() -> Container {
    let config = Config {
        bot: BotConfig {
            username: "trek_test_bot".to_string(),
            goodbye_delay_secs: 0,
            ..BotConfig::default()
        },
        ..Config::default()
    };
    Container::builder()
        .discover()
        .instance(config)
        .build()
        .unwrap()
}

fn recording() -> (Arc<RecordingSink>, Arc<dyn MessageSink>) {
    let recording = Arc::new(RecordingSink::default());
    let sink: Arc<dyn MessageSink> = recording.clone();
    (recording, sink)
}

#[tokio::test]
async fn test_start_command() {
    let container = container();
    let bot = container.resolve::<Bot>().unwrap();
    let (recording, sink) = recording();

    let handle = bot.on_update(Update::text(123, "/START"), &sink).await;

    assert!(handle.is_none());
    let sent = recording.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, 123);
    assert!(sent[0].text.contains("Хотите отправиться в путешествие"));
}

#[tokio::test]
async fn test_yes_sends_options_then_goodbye() {
    let container = container();
    let bot = container.resolve::<Bot>().unwrap();
    let (recording, sink) = recording();

    let handle = bot.on_update(Update::text(7, "Да"), &sink).await.unwrap();
    handle.await.unwrap();

    let sent = recording.sent.lock().unwrap();
    assert_eq!(sent.len(), 3);
    assert!(sent[0].text.starts_with("Отлично!"));
    let keyboard = sent[1].reply_markup.as_ref().unwrap();
    assert_eq!(keyboard.buttons().count(), TRAVEL_OPTIONS.len());
    assert!(sent[2].text.contains("https://keyslady.ru/"));
}

#[tokio::test]
async fn test_other_text_gets_prompt() {
    let container = container();
    let bot = container.resolve::<Bot>().unwrap();
    let (recording, sink) = recording();

    bot.on_update(Update::text(1, "Нет"), &sink).await;
    bot.on_update(Update::text(1, "/help"), &sink).await;
    bot.on_update(Update::text(1, "может быть"), &sink).await;

    let texts = recording.texts();
    assert!(texts[0].starts_with("Жаль!"));
    assert!(texts[1].contains("/start - начать диалог"));
    assert!(texts[2].starts_with("Пожалуйста"));
}

#[tokio::test]
async fn test_delivery_failure_does_not_abort_dispatch() {
    let container = container();
    let bot = container.resolve::<Bot>().unwrap();
    let sink: Arc<dyn MessageSink> = Arc::new(ClosedSink);

    let handle = bot.on_update(Update::text(5, "да"), &sink).await;
    handle.unwrap().await.unwrap();
}

#[tokio::test]
async fn test_failed_reply_still_sends_options_and_goodbye() {
    let container = container();
    let bot = container.resolve::<Bot>().unwrap();
    let flaky = Arc::new(FlakySink::default());
    let sink: Arc<dyn MessageSink> = flaky.clone();

    let handle = bot.on_update(Update::text(8, "  ДА  "), &sink).await;
    handle.expect("goodbye should be scheduled").await.unwrap();

    let texts = flaky.inner.texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].starts_with("Выберите тип путешествия"));
    assert!(texts[1].starts_with("Приятного путешествия!"));
}

#[tokio::test]
async fn test_bot_shares_singletons() {
    let container = container();
    let bot = container.resolve::<Bot>().unwrap();

    assert_eq!(bot.username(), "trek_test_bot");
    assert!(Arc::ptr_eq(&bot, &container.resolve::<Bot>().unwrap()));
    assert!(container.resolve::<dyn CommandService>().is_ok());
}

#[tokio::test]
async fn test_console_session_waits_for_goodbye() {
    let container = container();
    let bot = container.resolve::<Bot>().unwrap();
    let (recording, sink) = recording();

    let input = BufReader::new("/start\n\nда\n".as_bytes());
    let handled = console::serve(&bot, input, sink, false).await.unwrap();

    assert_eq!(handled, 2);
    let sent = recording.sent.lock().unwrap();
    assert_eq!(sent.len(), 4);
    assert!(sent.iter().all(|message| message.chat_id == console::CONSOLE_CHAT_ID));
    assert!(sent[3].text.starts_with("Приятного путешествия!"));
}

#[tokio::test]
async fn test_console_json_skips_malformed_lines() {
    let container = container();
    let bot = container.resolve::<Bot>().unwrap();
    let (recording, sink) = recording();

    let input = BufReader::new(
        "{\"message\":{\"chat_id\":99,\"text\":\"/help\"}}\nnot json\n{}\n".as_bytes(),
    );
    let handled = console::serve(&bot, input, sink, true).await.unwrap();

    assert_eq!(handled, 2);
    let sent = recording.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, 99);
}
