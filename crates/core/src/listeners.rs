use std::collections::BTreeMap;

use panscroll_protocol::{EventSource, HostCommand};

/// Reference counts host listeners shared by several components.
///
/// Auto-advance and the menu overlay both need user input events. Each
/// component emits its own `Listen` / `Unlisten`; only the first `Listen`
/// and the last `Unlisten` for a source reach the host.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    counts: BTreeMap<EventSource, usize>,
}

impl ListenerRegistry {
    pub fn is_listening(&self, source: EventSource) -> bool {
        self.counts.get(&source).is_some_and(|n| *n > 0)
    }

    /// Pass commands through, collapsing redundant listener changes.
    pub fn filter(&mut self, commands: Vec<HostCommand>) -> Vec<HostCommand> {
        commands
            .into_iter()
            .filter(|command| match command {
                HostCommand::Listen { source } => {
                    let count = self.counts.entry(*source).or_insert(0);
                    *count += 1;
                    *count == 1
                }
                HostCommand::Unlisten { source } => match self.counts.get_mut(source) {
                    Some(count) if *count > 0 => {
                        *count -= 1;
                        *count == 0
                    }
                    _ => false,
                },
                _ => true,
            })
            .collect()
    }

    /// Deregister everything still registered.
    pub fn drain(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.counts)
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(source, _)| HostCommand::Unlisten { source })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listen(source: EventSource) -> HostCommand {
        HostCommand::Listen { source }
    }

    fn unlisten(source: EventSource) -> HostCommand {
        HostCommand::Unlisten { source }
    }

    #[test]
    fn shared_listener_registered_once() {
        let mut registry = ListenerRegistry::default();
        let input = EventSource::UserInput;
        assert_eq!(registry.filter(vec![listen(input)]), vec![listen(input)]);
        assert!(registry.filter(vec![listen(input)]).is_empty());
        assert!(registry.filter(vec![unlisten(input)]).is_empty());
        assert!(registry.is_listening(input));
        assert_eq!(registry.filter(vec![unlisten(input)]), vec![unlisten(input)]);
        assert!(!registry.is_listening(input));
    }

    #[test]
    fn stray_unlisten_is_dropped() {
        let mut registry = ListenerRegistry::default();
        assert!(registry.filter(vec![unlisten(EventSource::Scroll)]).is_empty());
    }

    #[test]
    fn other_commands_pass_through() {
        let mut registry = ListenerRegistry::default();
        let cmds = vec![HostCommand::SmoothScrollTo { top: 10.0 }];
        assert_eq!(registry.filter(cmds.clone()), cmds);
    }

    #[test]
    fn drain_unregisters_everything() {
        let mut registry = ListenerRegistry::default();
        registry.filter(vec![listen(EventSource::Scroll), listen(EventSource::Resize)]);
        assert_eq!(
            registry.drain(),
            vec![unlisten(EventSource::Scroll), unlisten(EventSource::Resize)]
        );
        assert!(registry.drain().is_empty());
    }
}
