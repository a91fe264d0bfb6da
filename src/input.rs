use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    SwitchMode,
    RunRetro,
    Reconnect,
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Esc => Some(UiCommand::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            'm' => Some(UiCommand::SwitchMode),
            'r' => Some(UiCommand::RunRetro),
            'c' => Some(UiCommand::Reconnect),
            _ => None,
        },
        _ => None,
    }
}
