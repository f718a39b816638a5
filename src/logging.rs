use bevy::prelude::*;

/// Rolling log of construction activity, mirrored to the tracing output.
#[derive(Resource)]
pub struct TerminalLog {
    pub messages: Vec<String>,
    pub max_messages: usize,
}

impl Default for TerminalLog {
    fn default() -> Self {
        Self::new(200)
    }
}

impl TerminalLog {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages,
        }
    }

    pub fn add_message(&mut self, message: String) {
        self.messages.push(message);
        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }

    pub fn latest(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }
}

#[derive(Message, Clone, Debug)]
pub struct TerminalLogEvent {
    pub message: String,
}

impl TerminalLogEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub struct LoggingPlugin;

impl Plugin for LoggingPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(TerminalLog::default())
            .add_message::<TerminalLogEvent>()
            .add_systems(Update, consume_log_events);
    }
}

pub fn consume_log_events(
    mut reader: MessageReader<TerminalLogEvent>,
    mut terminal_log: ResMut<TerminalLog>,
) {
    for ev in reader.read() {
        info!("{}", ev.message);
        terminal_log.add_message(ev.message.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_bounded() {
        let mut log = TerminalLog::new(3);
        for i in 0..5 {
            log.add_message(format!("message {i}"));
        }
        assert_eq!(log.messages.len(), 3);
        assert_eq!(log.latest(), Some("message 4"));
        assert_eq!(log.messages[0], "message 2");
    }
}
