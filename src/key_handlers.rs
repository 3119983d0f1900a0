use crate::app::{App, AppState, Focus};
use crate::models::PendingQuestion;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const PAGE: u16 = 5;

/// Side effects the UI loop performs on behalf of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Dispatch(PendingQuestion),
    OpenLink(String),
}

pub fn handle_key(key: KeyEvent, app: &mut App) -> Option<Action> {
    match app.state {
        AppState::Chat => handle_chat_input(key, app),
        AppState::PickLink(message) => handle_pick_link_input(key, app, message),
        AppState::QuitConfirm => {
            handle_quit_confirm_input(key, app);
            None
        }
        AppState::Quit => None,
    }
}

pub fn handle_chat_input(key: KeyEvent, app: &mut App) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.state = AppState::QuitConfirm,
            KeyCode::Char('u') => app.scroll_up(PAGE),
            KeyCode::Char('d') => app.scroll_down(PAGE),
            KeyCode::Char('o') => app.pick_link_message(),
            _ => {}
        }
        return None;
    }

    if key.modifiers.contains(KeyModifiers::ALT) {
        if let KeyCode::Char(c @ '1'..='9') = key.code {
            let idx = (c as usize) - ('1' as usize);
            return app.ask_example(idx).map(Action::Dispatch);
        }
        return None;
    }

    match key.code {
        KeyCode::F(n @ 1..=12) => app.ask_example(usize::from(n - 1)).map(Action::Dispatch),
        KeyCode::Tab => {
            app.focus_next();
            None
        }
        KeyCode::BackTab => {
            app.focus_prev();
            None
        }
        KeyCode::PageUp => {
            app.scroll_up(PAGE);
            None
        }
        KeyCode::PageDown => {
            app.scroll_down(PAGE);
            None
        }
        KeyCode::Esc => {
            match app.focus {
                Focus::Input => app.state = AppState::QuitConfirm,
                Focus::Suggestion(_) => app.focus = Focus::Input,
            }
            None
        }
        KeyCode::Enter => match app.focus {
            Focus::Input => app.submit_draft().map(Action::Dispatch),
            Focus::Suggestion(idx) => app.ask_example(idx).map(Action::Dispatch),
        },
        KeyCode::Backspace => {
            app.focus = Focus::Input;
            app.conversation.pop_draft_char();
            None
        }
        KeyCode::Char(c) => {
            app.focus = Focus::Input;
            app.conversation.push_draft_char(c);
            None
        }
        _ => None,
    }
}

/// A digit opens that link of the picked reply; Ctrl+O moves to an older
/// reply; anything else goes back to chatting.
pub fn handle_pick_link_input(key: KeyEvent, app: &mut App, message: usize) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('o') {
        app.pick_link_message();
        return None;
    }

    app.state = AppState::Chat;
    match key.code {
        KeyCode::Char(c @ '1'..='9') => {
            let number = (c as usize) - ('0' as usize);
            app.link(message, number).map(Action::OpenLink)
        }
        _ => None,
    }
}

pub fn handle_quit_confirm_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            app.state = AppState::Quit;
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.state = AppState::Chat;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{Sender, Settlement};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            assert_eq!(handle_key(key(KeyCode::Char(c)), app), None);
        }
    }

    #[test]
    fn test_typing_and_enter_dispatches_question() {
        let mut app = App::new(&Config::default());
        type_text(&mut app, "balance?");
        assert_eq!(app.conversation.draft(), "balance?");

        let action = handle_key(key(KeyCode::Enter), &mut app);

        match action {
            Some(Action::Dispatch(pending)) => assert_eq!(pending.question, "balance?"),
            other => panic!("unexpected action: {:?}", other),
        }
        assert_eq!(app.conversation.draft(), "");
        assert_eq!(app.conversation.messages().last().unwrap().sender, Sender::User);
        assert!(app.conversation.is_typing());
    }

    #[test]
    fn test_enter_on_blank_draft_does_nothing() {
        let mut app = App::new(&Config::default());
        type_text(&mut app, "   ");

        assert_eq!(handle_key(key(KeyCode::Enter), &mut app), None);
        assert_eq!(app.conversation.messages().len(), 1);
        assert_eq!(app.conversation.draft(), "   ");
    }

    #[test]
    fn test_backspace_edits_draft() {
        let mut app = App::new(&Config::default());
        type_text(&mut app, "abc");
        handle_key(key(KeyCode::Backspace), &mut app);
        assert_eq!(app.conversation.draft(), "ab");
    }

    #[test]
    fn test_function_key_sends_example() {
        let mut app = App::new(&Config::default());
        let action = handle_key(key(KeyCode::F(1)), &mut app);

        match action {
            Some(Action::Dispatch(pending)) => {
                assert_eq!(pending.question, "How to check my account balance?")
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_alt_digit_sends_example() {
        let mut app = App::new(&Config::default());
        let action = handle_key(
            KeyEvent::new(KeyCode::Char('4'), KeyModifiers::ALT),
            &mut app,
        );

        match action {
            Some(Action::Dispatch(pending)) => {
                assert_eq!(pending.question, "How to contact customer support?")
            }
            other => panic!("unexpected action: {:?}", other),
        }
        assert_eq!(app.conversation.draft(), "");
    }

    #[test]
    fn test_function_key_past_examples_is_ignored() {
        let mut app = App::new(&Config::default());
        assert_eq!(handle_key(key(KeyCode::F(9)), &mut app), None);
        assert_eq!(app.conversation.messages().len(), 1);
    }

    #[test]
    fn test_tab_then_enter_sends_focused_example() {
        let mut app = App::new(&Config::default());
        handle_key(key(KeyCode::Tab), &mut app);
        handle_key(key(KeyCode::Tab), &mut app);
        assert_eq!(app.focus, Focus::Suggestion(1));

        let action = handle_key(key(KeyCode::Enter), &mut app);
        match action {
            Some(Action::Dispatch(pending)) => {
                assert_eq!(pending.question, "How can I transfer funds?")
            }
            other => panic!("unexpected action: {:?}", other),
        }
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn test_typing_while_awaiting_reply_is_allowed() {
        let mut app = App::new(&Config::default());
        type_text(&mut app, "first");
        handle_key(key(KeyCode::Enter), &mut app);
        type_text(&mut app, "second");

        assert!(app.conversation.is_typing());
        assert_eq!(app.conversation.draft(), "second");
        assert!(matches!(
            handle_key(key(KeyCode::Enter), &mut app),
            Some(Action::Dispatch(_))
        ));
    }

    #[test]
    fn test_esc_leaves_suggestions_before_quitting() {
        let mut app = App::new(&Config::default());
        handle_key(key(KeyCode::Tab), &mut app);
        handle_key(key(KeyCode::Esc), &mut app);
        assert_eq!(app.focus, Focus::Input);
        assert_eq!(app.state, AppState::Chat);

        handle_key(key(KeyCode::Esc), &mut app);
        assert_eq!(app.state, AppState::QuitConfirm);
    }

    #[test]
    fn test_quit_confirm() {
        let mut app = App::new(&Config::default());
        handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut app,
        );
        assert_eq!(app.state, AppState::QuitConfirm);

        handle_key(key(KeyCode::Char('n')), &mut app);
        assert_eq!(app.state, AppState::Chat);

        app.state = AppState::QuitConfirm;
        handle_key(key(KeyCode::Char('y')), &mut app);
        assert_eq!(app.state, AppState::Quit);
    }

    fn ctrl_o() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL)
    }

    fn settle_reply(app: &mut App, reply: &str) {
        let pending = app.ask_example(0).unwrap();
        app.apply_settlement(Settlement {
            id: pending.id,
            reply: reply.to_string(),
        });
    }

    #[test]
    fn test_ctrl_o_then_number_opens_that_link() {
        let mut app = App::new(&Config::default());
        settle_reply(
            &mut app,
            "See [balances](https://example.com/balances) and [fees](https://example.com/fees).",
        );

        assert_eq!(handle_key(ctrl_o(), &mut app), None);
        assert!(matches!(app.state, AppState::PickLink(_)));

        let action = handle_key(key(KeyCode::Char('2')), &mut app);
        assert_eq!(
            action,
            Some(Action::OpenLink("https://example.com/fees".to_string()))
        );
        assert_eq!(app.state, AppState::Chat);
        assert_eq!(app.conversation.draft(), "");
    }

    #[test]
    fn test_ctrl_o_twice_reaches_older_reply() {
        let mut app = App::new(&Config::default());
        settle_reply(&mut app, "Older: [rates](https://example.com/rates)");
        settle_reply(&mut app, "Newer: [help](https://example.com/help)");

        handle_key(ctrl_o(), &mut app);
        handle_key(ctrl_o(), &mut app);
        let action = handle_key(key(KeyCode::Char('1')), &mut app);
        assert_eq!(
            action,
            Some(Action::OpenLink("https://example.com/rates".to_string()))
        );
    }

    #[test]
    fn test_non_web_link_is_not_opened() {
        let mut app = App::new(&Config::default());
        settle_reply(&mut app, "Your [statement](file:///etc/passwd)");

        handle_key(ctrl_o(), &mut app);
        assert_eq!(handle_key(key(KeyCode::Char('1')), &mut app), None);
        assert_eq!(app.state, AppState::Chat);
    }

    #[test]
    fn test_other_key_cancels_link_picking() {
        let mut app = App::new(&Config::default());
        settle_reply(&mut app, "[help](https://example.com/help)");

        handle_key(ctrl_o(), &mut app);
        assert_eq!(handle_key(key(KeyCode::Esc), &mut app), None);
        assert_eq!(app.state, AppState::Chat);
    }

    #[test]
    fn test_ctrl_o_without_links_stays_in_chat() {
        let mut app = App::new(&Config::default());
        handle_key(ctrl_o(), &mut app);
        assert_eq!(app.state, AppState::Chat);
    }

    #[test]
    fn test_page_keys_scroll() {
        let mut app = App::new(&Config::default());
        handle_key(key(KeyCode::PageUp), &mut app);
        assert_eq!(app.scroll_from_bottom, PAGE);
        handle_key(key(KeyCode::PageDown), &mut app);
        assert_eq!(app.scroll_from_bottom, 0);
    }
}
