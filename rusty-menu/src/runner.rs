//! Keeps live menu sessions running and routes button presses to them.
//!
//! Every session that is still navigable after its first render is moved
//! into its own task. The task drains a queue of presses one at a time, so a
//! page change and its delivery always complete before the next press is
//! looked at. The inactivity timeout is the queue's receive deadline.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, warn};

use crate::channel::{ChannelMode, ResponseChannel};
use crate::error::MenuResult;
use crate::session::{MenuEvent, MenuSession, NavOutcome};

const EVENT_QUEUE_CAPACITY: usize = 16;

type SessionMap<I> = HashMap<u64, mpsc::Sender<MenuEvent<I>>>;

/// Result of routing a press to a session.
#[derive(Debug)]
pub enum Dispatch<I> {
    /// The press was queued for the session.
    Queued,
    /// No live session has this ID; the press is handed back.
    Unknown(MenuEvent<I>),
}

/// Live menu sessions keyed by session ID.
pub struct MenuRegistry<I> {
    sessions: Arc<Mutex<SessionMap<I>>>,
}

impl<I> Clone for MenuRegistry<I> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<I> Default for MenuRegistry<I> {
    fn default() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<I> MenuRegistry<I>
where
    I: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Post the first page and keep the session alive while it can navigate.
    ///
    /// Single-page menus are rendered and then dropped.
    pub async fn launch<C, E, V, Ch>(
        &self,
        session_id: u64,
        mut session: MenuSession<C, E, V, Ch>,
    ) -> MenuResult<()>
    where
        C: Send + Sync + 'static,
        E: Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
        Ch: ResponseChannel<V, Interaction = I> + 'static,
    {
        session.start().await?;

        if !session.is_active() {
            debug!(session_id, "menu has nothing to navigate, not registering");
            return Ok(());
        }

        let (sender, receiver) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        if self
            .sessions
            .lock()
            .await
            .insert(session_id, sender.clone())
            .is_some()
        {
            warn!(session_id, "replaced an existing menu session");
        }

        let registry = self.clone();
        tokio::spawn(async move {
            run_session(session_id, session, receiver).await;
            registry.remove_if_current(session_id, &sender).await;
        });

        Ok(())
    }

    /// Queue a press for the session it belongs to.
    pub async fn dispatch(&self, session_id: u64, event: MenuEvent<I>) -> Dispatch<I> {
        let sender = self.sessions.lock().await.get(&session_id).cloned();
        let Some(sender) = sender else {
            return Dispatch::Unknown(event);
        };

        match sender.send(event).await {
            Ok(()) => Dispatch::Queued,
            Err(mpsc::error::SendError(event)) => Dispatch::Unknown(event),
        }
    }

    pub async fn contains(&self, session_id: u64) -> bool {
        self.sessions.lock().await.contains_key(&session_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn remove_if_current(&self, session_id: u64, sender: &mpsc::Sender<MenuEvent<I>>) {
        let mut sessions = self.sessions.lock().await;
        if sessions
            .get(&session_id)
            .is_some_and(|current| current.same_channel(sender))
        {
            sessions.remove(&session_id);
        }
    }
}

async fn run_session<C, E, V, Ch>(
    session_id: u64,
    mut session: MenuSession<C, E, V, Ch>,
    mut events: mpsc::Receiver<MenuEvent<Ch::Interaction>>,
) where
    C: Sync,
    E: Sync,
    V: Clone + Send + Sync + 'static,
    Ch: ResponseChannel<V>,
{
    while session.is_active() {
        let event = match tokio::time::timeout(session.timeout(), events.recv()).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                debug!(session_id, "menu queue closed");
                break;
            }
            Err(_elapsed) => {
                if let Err(source) = session.on_timeout().await {
                    error!(?source, session_id, "menu timeout handling failed");
                }
                break;
            }
        };

        let result = session.handle(&event).await;
        let answered = session.channel().mode() == ChannelMode::Interaction
            && matches!(
                result,
                Ok(NavOutcome::Rendered { .. } | NavOutcome::Stopped)
            );

        match result {
            Ok(outcome) => debug!(session_id, ?outcome, action = ?event.action, "menu press handled"),
            Err(source) => error!(?source, session_id, action = ?event.action, "menu press failed"),
        }

        if !answered
            && let Some(interaction) = event.interaction.as_ref()
            && let Err(source) = session.acknowledge(interaction).await
        {
            warn!(?source, session_id, "failed to acknowledge menu press");
        }
    }

    // Presses queued behind the one that ended the menu still need an answer.
    events.close();
    while let Ok(event) = events.try_recv() {
        if let Some(interaction) = event.interaction.as_ref()
            && let Err(source) = session.acknowledge(interaction).await
        {
            warn!(?source, session_id, "failed to acknowledge late menu press");
        }
    }

    info!(session_id, page = session.current_page(), "menu session finished");
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::controls::NavAction;
    use crate::session::{MenuOptions, MenuState};
    use crate::test_support::{Delivery, RecordingChannel, counting_formatter};

    const OWNER: u64 = 1;

    fn menu(len: u32, channel: RecordingChannel) -> MenuSession<(), u32, String, RecordingChannel> {
        MenuSession::new(
            (),
            OWNER,
            (0..len).collect(),
            counting_formatter(Arc::new(AtomicUsize::new(0))),
            MenuOptions::new(10),
            channel,
        )
        .unwrap()
    }

    fn click(action: NavAction, actor_id: u64, token: u64) -> MenuEvent<u64> {
        MenuEvent {
            action,
            actor_id,
            interaction: Some(token),
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn inactivity_stops_the_menu_and_unregisters_it() {
        let registry = MenuRegistry::new();
        let channel = RecordingChannel::interaction();
        let log = channel.log();

        registry.launch(9, menu(30, channel)).await.unwrap();
        assert!(registry.contains(9).await);

        tokio::time::sleep(Duration::from_secs(61)).await;

        assert!(registry.is_empty().await);
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert!(matches!(log[1], Delivery::EditOriginal { .. }));
        assert!(log[1].controls().controls.iter().all(|c| !c.enabled));
    }

    #[tokio::test(start_paused = true)]
    async fn presses_reset_the_inactivity_window() {
        let registry = MenuRegistry::new();
        let channel = RecordingChannel::interaction();
        let log = channel.log();
        registry.launch(9, menu(30, channel)).await.unwrap();

        tokio::time::sleep(Duration::from_secs(50)).await;
        let dispatch = registry.dispatch(9, click(NavAction::Next, OWNER, 5)).await;
        assert!(matches!(dispatch, Dispatch::Queued));

        tokio::time::sleep(Duration::from_secs(50)).await;
        assert!(registry.contains(9).await);
        assert_eq!(log.lock().unwrap().len(), 2);

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(!registry.contains(9).await);
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_finishes_the_session() {
        let registry = MenuRegistry::new();
        let channel = RecordingChannel::interaction();
        let log = channel.log();
        let acks = channel.acks();
        registry.launch(9, menu(30, channel)).await.unwrap();

        registry.dispatch(9, click(NavAction::Pause, OWNER, 3)).await;
        settle().await;

        assert!(!registry.contains(9).await);
        assert!(matches!(
            log.lock().unwrap()[1],
            Delivery::EditInteraction { token: 3, .. }
        ));
        assert!(acks.lock().unwrap().is_empty());

        let late = registry.dispatch(9, click(NavAction::Next, OWNER, 4)).await;
        assert!(matches!(late, Dispatch::Unknown(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn presses_queued_behind_pause_are_acknowledged() {
        let registry = MenuRegistry::new();
        let channel = RecordingChannel::interaction();
        let log = channel.log();
        let acks = channel.acks();
        registry.launch(9, menu(30, channel)).await.unwrap();

        let pause = registry.dispatch(9, click(NavAction::Pause, OWNER, 3)).await;
        let next = registry.dispatch(9, click(NavAction::Next, OWNER, 4)).await;
        assert!(matches!(pause, Dispatch::Queued));
        assert!(matches!(next, Dispatch::Queued));
        settle().await;

        assert!(!registry.contains(9).await);
        assert_eq!(log.lock().unwrap().len(), 2);
        assert_eq!(*acks.lock().unwrap(), vec![4]);
    }

    #[tokio::test(start_paused = true)]
    async fn ignored_presses_are_acknowledged_without_rendering() {
        let registry = MenuRegistry::new();
        let channel = RecordingChannel::interaction();
        let log = channel.log();
        let acks = channel.acks();
        registry.launch(9, menu(30, channel)).await.unwrap();

        registry.dispatch(9, click(NavAction::Next, 99, 7)).await;
        registry.dispatch(9, click(NavAction::Previous, OWNER, 8)).await;
        settle().await;

        assert_eq!(log.lock().unwrap().len(), 1);
        assert_eq!(*acks.lock().unwrap(), vec![7, 8]);
    }

    #[tokio::test(start_paused = true)]
    async fn plain_menus_acknowledge_every_press() {
        let registry = MenuRegistry::new();
        let channel = RecordingChannel::plain(false);
        let log = channel.log();
        let acks = channel.acks();
        registry.launch(9, menu(30, channel)).await.unwrap();

        registry.dispatch(9, click(NavAction::Next, OWNER, 1)).await;
        registry.dispatch(9, click(NavAction::Last, OWNER, 2)).await;
        settle().await;

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 3);
        assert!(matches!(log[2], Delivery::EditMessage { .. }));
        assert_eq!(*acks.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn single_page_menus_are_not_registered() {
        let registry = MenuRegistry::new();
        let channel = RecordingChannel::interaction();
        let log = channel.log();

        let session = menu(4, channel);
        assert_eq!(session.state(), MenuState::SinglePage);
        registry.launch(9, session).await.unwrap();

        assert!(registry.is_empty().await);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_sessions_hand_the_press_back() {
        let registry: MenuRegistry<u64> = MenuRegistry::new();
        let Dispatch::Unknown(event) = registry.dispatch(1, click(NavAction::Next, OWNER, 3)).await
        else {
            panic!("expected an unknown session");
        };
        assert_eq!(event.interaction, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn formatter_is_called_once_per_page_across_presses() {
        let registry = MenuRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let session = MenuSession::new(
            (),
            OWNER,
            (0..30).collect::<Vec<u32>>(),
            counting_formatter(Arc::clone(&calls)),
            MenuOptions::new(10),
            RecordingChannel::interaction(),
        )
        .unwrap();
        registry.launch(9, session).await.unwrap();

        for (token, action) in [NavAction::Next, NavAction::Previous, NavAction::Next]
            .into_iter()
            .enumerate()
        {
            registry.dispatch(9, click(action, OWNER, token as u64)).await;
        }
        settle().await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
