//! Travel conversation: greeting, yes/no answer, options and farewell.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::CommandService;
use crate::config::Config;
use crate::di::{Inject, Injectable};
use crate::logger::Logger;
use crate::models::{InlineButton, InlineKeyboard, OutgoingMessage};
use crate::transport::MessageSink;

const GREETING: &str = "Привет! Хотите отправиться в путешествие? (Да/Нет)";
const ACCEPTED: &str = "Отлично! Вот варианты для поездки, а также вы можете подобрать жилье и страховку. Как бонус статья, как можно зарабатывать в поездках и путешествиях в конце списка!";
const DECLINED: &str = "Жаль! Если передумаете - просто напишите /start";
const PROMPT: &str =
    "Пожалуйста, введите 'Да' по-русски, если хотите продолжить, или 'Нет' для выхода.";
const OPTIONS_TITLE: &str = "Выберите тип путешествия:";
const GOODBYE: &str = "Приятного путешествия! Если хотите больше информации про путешествия, горящие туры, календарь низких цен - заходите ко мне на сайт https://keyslady.ru/";
const HELP: &str = "Доступные команды:\n/start - начать диалог";

/// Travel option buttons as (label, link).
pub const TRAVEL_OPTIONS: [(&str, &str); 9] = [
    ("1. Экскурсии", "https://tripster.tp.st/Pr5STfjY?erid=2VtzqxAsKVL"),
    ("2. Туры с перелетом", "https://travelata.tp.st/N5mhcEzA?erid=2Vtzqw422R8"),
    ("3. Санатории", "https://sanatory.tp.st/YBl7VDw8?erid=2VtzqvmBLWG"),
    ("4. Круизы", "https://lavoyage.tp.st/I1mwtXxV?erid=2VtzqufYFY8"),
    ("5. Отели", "https://hotellook.tp.st/5nalTqC1"),
    ("6. Квартиры посуточно", "https://sutochno.tp.st/Atl2dRdj"),
    ("7. Связь в роуминге", "https://yesim.tp.st/dOy2DoeY?erid=2VtzquZdJrY"),
    ("8. Страховка", "https://cherehapa.tp.st/BLDnBaE5?erid=2VtzqwzQ8kJ"),
    (
        "9. Как зарабатывать на путешествиях",
        "https://keyslady.ru/путешествуй-с-удовольствием-и-зараба/?swcfpc=1",
    ),
];

#[derive(Injectable, Default)]
#[injectable(provides(dyn CommandService))]
pub struct TravelCommandService {
    #[inject]
    logger: Inject<dyn Logger>,
    #[inject]
    config: Inject<Config>,
}

impl CommandService for TravelCommandService {
    fn start_command(&self, chat_id: i64) -> OutgoingMessage {
        self.logger
            .info(&format!("Обработка команды /start для чата: {chat_id}"));
        OutgoingMessage::new(chat_id, GREETING)
    }

    fn handle_user_response(&self, chat_id: i64, text: &str) -> OutgoingMessage {
        let reply = match text.trim().to_lowercase().as_str() {
            "да" => ACCEPTED,
            "нет" => DECLINED,
            _ => PROMPT,
        };
        OutgoingMessage::new(chat_id, reply)
    }

    fn show_travel_options(&self, chat_id: i64) -> OutgoingMessage {
        self.logger
            .info(&format!("Показ вариантов путешествий для чата: {chat_id}"));
        let keyboard = InlineKeyboard::column(
            TRAVEL_OPTIONS
                .iter()
                .map(|(text, url)| InlineButton::link(*text, *url)),
        );
        OutgoingMessage::new(chat_id, OPTIONS_TITLE).with_keyboard(keyboard)
    }

    fn goodbye_message(&self, chat_id: i64) -> OutgoingMessage {
        OutgoingMessage::new(chat_id, GOODBYE)
    }

    fn help(&self, chat_id: i64) -> OutgoingMessage {
        OutgoingMessage::new(chat_id, HELP)
    }

    fn schedule_goodbye(&self, chat_id: i64, sink: Arc<dyn MessageSink>) -> JoinHandle<()> {
        let delay = self.config.bot.goodbye_delay();
        let logger = self.logger.shared();
        let message = self.goodbye_message(chat_id);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = sink.send(message).await {
                logger.error(&format!("Ошибка при отправке сообщения: {e}"));
            }
        })
    }
}
