// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shapes log history into the outgoing message list.

use selves_core::{Message, Role};

use crate::types::WireMessage;

/// Builds the `messages` array for one exchange.
///
/// Placeholders are dropped first, then only the most recent `window`
/// messages are kept (oldest dropped first). The new user text is appended
/// last and is not counted against the window.
pub fn outgoing_messages(
    history: &[Message],
    new_user_text: &str,
    window: usize,
) -> Vec<WireMessage> {
    let kept: Vec<&Message> = history.iter().filter(|m| !m.is_placeholder()).collect();
    let skip = kept.len().saturating_sub(window);

    kept.into_iter()
        .skip(skip)
        .map(WireMessage::from)
        .chain(std::iter::once(WireMessage::new(
            Role::User.to_string(),
            new_user_text,
        )))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn numbered(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("u{i}"))
                } else {
                    Message::assistant(format!("a{i}"))
                }
            })
            .collect()
    }

    #[test]
    fn short_history_is_kept_whole() {
        let out = outgoing_messages(&numbered(3), "next", 12);
        let contents: Vec<&str> = out.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["u0", "a1", "u2", "next"]);
        assert_eq!(out.last().unwrap().role, "user");
    }

    #[test]
    fn long_history_keeps_most_recent() {
        let out = outgoing_messages(&numbered(20), "next", 12);
        assert_eq!(out.len(), 13);
        assert_eq!(out[0].content, "u8");
        assert_eq!(out[11].content, "a19");
    }

    #[test]
    fn placeholder_is_excluded_wherever_it_sits() {
        let mut history = numbered(4);
        history.insert(1, Message::placeholder());
        history.push(Message::placeholder());
        let out = outgoing_messages(&history, "next", 12);
        assert!(out.iter().all(|m| m.content != selves_core::PLACEHOLDER));
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn user_typed_ellipsis_is_not_a_placeholder() {
        let history = vec![Message::user("…")];
        let out = outgoing_messages(&history, "next", 12);
        assert_eq!(out.len(), 2);
    }

    proptest! {
        #[test]
        fn window_keeps_exact_most_recent_suffix(
            len in 0usize..40,
            window in 1usize..20,
            placeholder_at in proptest::option::of(0usize..40),
        ) {
            let mut history = numbered(len);
            if let Some(at) = placeholder_at {
                history.insert(at.min(history.len()), Message::placeholder());
            }

            let out = outgoing_messages(&history, "new", window);

            let real: Vec<&Message> = history.iter().filter(|m| !m.is_placeholder()).collect();
            let expected: Vec<&str> = real[real.len().saturating_sub(window)..]
                .iter()
                .map(|m| m.content.as_str())
                .collect();
            let sent: Vec<&str> = out[..out.len() - 1].iter().map(|m| m.content.as_str()).collect();

            prop_assert_eq!(sent, expected);
            prop_assert_eq!(out.len(), real.len().min(window) + 1);
            prop_assert_eq!(out.last().map(|m| m.content.as_str()), Some("new"));
        }
    }
}
