//! Daily menu command handler.
//!
//! `/dailymenu <restaurant>` looks the name up in an immutable registry
//! built at startup and relays the restaurant's current menu text. An
//! unknown or missing name prompts with the list of registered names.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::fetch::PageFetcher;
use crate::telegram::{Message, Messenger};

/// Command name for the menu lookup.
pub const COMMAND: &str = "dailymenu";

const PROMPT_UNKNOWN: &str = "Please specify one of the following restaurants:";
const MENU_UNAVAILABLE: &str = "The menu is unavailable right now, please try again later.";

/// A named source of menu text.
#[async_trait]
pub trait Restaurant: Send + Sync {
    /// Current menu as formatted text.
    async fn menu(&self) -> String;
}

/// Restaurant whose menu is scraped from a web page.
#[derive(Debug, Clone)]
pub struct PageMenu {
    url: String,
    fetcher: PageFetcher,
}

impl PageMenu {
    #[must_use]
    pub fn new(url: String, fetcher: PageFetcher) -> Self {
        Self { url, fetcher }
    }
}

#[async_trait]
impl Restaurant for PageMenu {
    async fn menu(&self) -> String {
        // Some menu pages are served with a 404 status; their body is
        // still the menu.
        let body = self.fetcher.page_source_ignore_not_found(&self.url).await;
        if body.is_empty() {
            MENU_UNAVAILABLE.to_owned()
        } else {
            body
        }
    }
}

/// Handler for the `/dailymenu` command.
pub struct DailyMenuCommand {
    restaurants: HashMap<String, Box<dyn Restaurant>>,
    messenger: Arc<dyn Messenger>,
}

impl DailyMenuCommand {
    /// Creates the handler over a registry built at startup.
    ///
    /// The registry is never mutated afterwards; lookups are
    /// case-sensitive exact matches.
    #[must_use]
    pub fn new(
        restaurants: HashMap<String, Box<dyn Restaurant>>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            restaurants,
            messenger,
        }
    }

    /// Processes one menu command invocation.
    pub async fn handle(&self, message: &Message, args: &str) {
        debug!("dailymenu args: '{}'", args);

        let text = match self.restaurants.get(args) {
            Some(restaurant) => restaurant.menu().await,
            None => {
                let names: Vec<&str> = self.restaurants.keys().map(String::as_str).collect();
                format!("{PROMPT_UNKNOWN}\n{}", names.join(", "))
            }
        };

        self.messenger.send_text(message.chat.id, &text).await;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::telegram::testing::{message, user, RecordingMessenger};

    const CHAT: i64 = -200;

    struct StaticMenu(&'static str);

    #[async_trait]
    impl Restaurant for StaticMenu {
        async fn menu(&self) -> String {
            self.0.to_owned()
        }
    }

    fn registry(names: &[&str]) -> HashMap<String, Box<dyn Restaurant>> {
        names
            .iter()
            .map(|&name| {
                (
                    name.to_owned(),
                    Box::new(StaticMenu("soup of the day")) as Box<dyn Restaurant>,
                )
            })
            .collect()
    }

    async fn run(handler: &DailyMenuCommand, args: &str) {
        let msg = message(CHAT, user(1, "alice"), &format!("/dailymenu {args}"));
        handler.handle(&msg, args).await;
    }

    #[tokio::test]
    async fn test_known_restaurant_relays_menu_verbatim() {
        let messenger = Arc::new(RecordingMessenger::new());
        let handler = DailyMenuCommand::new(registry(&["kanas"]), Arc::clone(&messenger) as Arc<dyn Messenger>);

        run(&handler, "kanas").await;

        assert_eq!(
            messenger.sent().await,
            vec![(CHAT, "soup of the day".to_owned())]
        );
    }

    #[tokio::test]
    async fn test_unknown_restaurant_lists_each_name_once() {
        let messenger = Arc::new(RecordingMessenger::new());
        let handler = DailyMenuCommand::new(
            registry(&["kanas", "bistro", "cantina"]),
            Arc::clone(&messenger) as Arc<dyn Messenger>,
        );

        run(&handler, "nope").await;

        let sent = messenger.sent().await;
        assert_eq!(sent.len(), 1);
        let (chat_id, text) = &sent[0];
        assert_eq!(*chat_id, CHAT);
        assert!(text.starts_with(PROMPT_UNKNOWN));

        // Order-independent: compare as a set.
        let listed: HashSet<&str> = text
            .lines()
            .nth(1)
            .unwrap_or("")
            .split(", ")
            .collect();
        let expected: HashSet<&str> = ["kanas", "bistro", "cantina"].into();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn test_empty_args_prompts_regardless_of_registry_size() {
        for names in [&["kanas"][..], &["kanas", "bistro"][..]] {
            let messenger = Arc::new(RecordingMessenger::new());
            let handler = DailyMenuCommand::new(registry(names), Arc::clone(&messenger) as Arc<dyn Messenger>);

            run(&handler, "").await;

            let sent = messenger.sent().await;
            assert_eq!(sent.len(), 1);
            assert!(sent[0].1.starts_with(PROMPT_UNKNOWN));
        }
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let messenger = Arc::new(RecordingMessenger::new());
        let handler = DailyMenuCommand::new(registry(&["kanas"]), Arc::clone(&messenger) as Arc<dyn Messenger>);

        run(&handler, "Kanas").await;

        let sent = messenger.sent().await;
        assert!(sent[0].1.starts_with(PROMPT_UNKNOWN));
    }
}
