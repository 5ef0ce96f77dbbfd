//! The interactive menu session: navigation state plus delivery.

use std::{fmt, sync::Arc, time::Duration};

use futures_util::future::BoxFuture;
use tracing::{debug, info};

use crate::channel::{ChannelMode, EditTarget, ResponseChannel};
use crate::controls::{ControlLayout, NavAction};
use crate::error::{MenuError, MenuResult};
use crate::paginator::{PageFormatter, Paginator};

/// Inactivity window after which a menu stops itself.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Replacement for the built-in stop when a menu times out.
pub type TimeoutFn = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuState {
    /// Buttons are live.
    Active,
    /// Only one page exists, so no buttons are shown.
    SinglePage,
    /// Stopped by the owner or by inactivity. Terminal.
    Stopped,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NavigationState {
    pub current_page: usize,
    pub state: MenuState,
    pub show_skip_buttons: bool,
}

/// Construction options for a menu.
#[derive(Clone)]
pub struct MenuOptions {
    pub per_page: usize,
    /// Send the first interaction response as ephemeral.
    pub whisper: bool,
    pub show_skip_buttons: bool,
    pub start_page: usize,
    pub timeout: Duration,
    pub timeout_handler: Option<TimeoutFn>,
}

impl MenuOptions {
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page,
            whisper: false,
            show_skip_buttons: true,
            start_page: 1,
            timeout: DEFAULT_TIMEOUT,
            timeout_handler: None,
        }
    }

    pub fn whisper(mut self, whisper: bool) -> Self {
        self.whisper = whisper;
        self
    }

    pub fn show_skip_buttons(mut self, show: bool) -> Self {
        self.show_skip_buttons = show;
        self
    }

    pub fn start_page(mut self, page: usize) -> Self {
        self.start_page = page;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn on_timeout(mut self, handler: TimeoutFn) -> Self {
        self.timeout_handler = Some(handler);
        self
    }
}

impl fmt::Debug for MenuOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuOptions")
            .field("per_page", &self.per_page)
            .field("whisper", &self.whisper)
            .field("show_skip_buttons", &self.show_skip_buttons)
            .field("start_page", &self.start_page)
            .field("timeout", &self.timeout)
            .field("timeout_handler", &self.timeout_handler.is_some())
            .finish()
    }
}

/// A button press on a menu.
#[derive(Debug)]
pub struct MenuEvent<I> {
    pub action: NavAction,
    pub actor_id: u64,
    /// The interaction to answer, when the press arrived as one.
    pub interaction: Option<I>,
}

/// Why an event changed nothing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IgnoreReason {
    /// Pressed by someone other than the owner.
    Unauthorized,
    /// The menu is stopped or only has one page.
    Inactive,
    /// Already on the first or last page.
    AtBoundary,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NavOutcome {
    Rendered { page: usize },
    Stopped,
    TimedOut,
    Ignored(IgnoreReason),
}

/// One paginated view owned by one user.
pub struct MenuSession<C, E, V, Ch> {
    ctx: C,
    owner_id: u64,
    paginator: Paginator<C, E, V>,
    nav: NavigationState,
    whisper: bool,
    timeout: Duration,
    timeout_handler: Option<TimeoutFn>,
    channel: Ch,
}

impl<C, E, V, Ch> MenuSession<C, E, V, Ch>
where
    C: Sync,
    E: Sync,
    V: Clone + Send + Sync + 'static,
    Ch: ResponseChannel<V>,
{
    pub fn new(
        ctx: C,
        owner_id: u64,
        entries: Vec<E>,
        formatter: impl PageFormatter<C, E, V> + 'static,
        options: MenuOptions,
        channel: Ch,
    ) -> MenuResult<Self> {
        let paginator = Paginator::new(entries, options.per_page, formatter)?;
        let total_pages = paginator.page_count();

        if options.start_page == 0 || options.start_page > total_pages {
            return Err(MenuError::InvalidConfiguration(format!(
                "start_page {} is outside 1-{total_pages}",
                options.start_page
            )));
        }

        if options.timeout.is_zero() {
            return Err(MenuError::InvalidConfiguration(
                "timeout must be greater than zero".to_owned(),
            ));
        }

        let state = if total_pages == 1 {
            MenuState::SinglePage
        } else {
            MenuState::Active
        };

        Ok(Self {
            ctx,
            owner_id,
            paginator,
            nav: NavigationState {
                current_page: options.start_page,
                state,
                show_skip_buttons: options.show_skip_buttons,
            },
            whisper: options.whisper,
            timeout: options.timeout,
            timeout_handler: options.timeout_handler,
            channel,
        })
    }

    pub fn owner_id(&self) -> u64 {
        self.owner_id
    }

    pub fn current_page(&self) -> usize {
        self.nav.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.page_count()
    }

    pub fn state(&self) -> MenuState {
        self.nav.state
    }

    pub fn navigation(&self) -> NavigationState {
        self.nav
    }

    pub fn is_active(&self) -> bool {
        self.nav.state == MenuState::Active
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn controls(&self) -> ControlLayout {
        ControlLayout::for_state(&self.nav, self.total_pages())
    }

    pub fn channel(&self) -> &Ch {
        &self.channel
    }

    /// Acknowledge a press that did not produce a render.
    pub async fn acknowledge(&mut self, interaction: &Ch::Interaction) -> MenuResult<()> {
        self.channel
            .acknowledge(interaction)
            .await
            .map_err(|source| MenuError::ChannelDeliveryFailure {
                page: self.nav.current_page,
                source,
            })
    }

    /// Post the first render of the menu.
    pub async fn start(&mut self) -> MenuResult<()> {
        let page = self.nav.current_page;
        let view = self.paginator.render_page(&self.ctx, page).await?;
        let controls = self.controls();
        deliver(&mut self.channel, self.whisper, &view, &controls, page, None).await?;

        info!(
            owner_id = self.owner_id,
            page,
            total_pages = self.total_pages(),
            "menu started"
        );
        Ok(())
    }

    /// Apply a button press.
    ///
    /// Presses from anyone but the owner, presses on an inactive menu, and
    /// moves past either end are ignored without rendering anything.
    pub async fn handle(&mut self, event: &MenuEvent<Ch::Interaction>) -> MenuResult<NavOutcome> {
        if event.actor_id != self.owner_id {
            debug!(
                owner_id = self.owner_id,
                actor_id = event.actor_id,
                "ignoring menu press from non-owner"
            );
            return Ok(NavOutcome::Ignored(IgnoreReason::Unauthorized));
        }

        if !self.is_active() {
            return Ok(NavOutcome::Ignored(IgnoreReason::Inactive));
        }

        if event.action == NavAction::Pause {
            return self.stop_with(event.interaction.as_ref()).await;
        }

        let Some(target) = self.target_page(event.action) else {
            return Ok(NavOutcome::Ignored(IgnoreReason::AtBoundary));
        };

        self.navigate_to(target, event.interaction.as_ref()).await
    }

    /// Stop the menu, leaving the current page visible with disabled buttons.
    pub async fn stop(&mut self) -> MenuResult<NavOutcome> {
        self.stop_with(None).await
    }

    /// Inactivity timeout: runs the configured override, or stops.
    pub async fn on_timeout(&mut self) -> MenuResult<NavOutcome> {
        if !self.is_active() {
            return Ok(NavOutcome::Ignored(IgnoreReason::Inactive));
        }

        let Some(handler) = self.timeout_handler.clone() else {
            return match self.stop_with(None).await? {
                NavOutcome::Stopped => Ok(NavOutcome::TimedOut),
                other => Ok(other),
            };
        };

        self.nav.state = MenuState::Stopped;
        info!(owner_id = self.owner_id, "menu timed out, running custom handler");
        handler().await.map_err(MenuError::TimeoutHandlerFailure)?;
        Ok(NavOutcome::TimedOut)
    }

    fn target_page(&self, action: NavAction) -> Option<usize> {
        let current = self.nav.current_page;
        let last = self.total_pages();

        match action {
            NavAction::First | NavAction::Previous if current <= 1 => None,
            NavAction::Next | NavAction::Last if current >= last => None,
            NavAction::First => Some(1),
            NavAction::Previous => Some(current - 1),
            NavAction::Next => Some(current + 1),
            NavAction::Last => Some(last),
            NavAction::Pause => None,
        }
    }

    // The page only changes once its view rendered and was delivered.
    async fn navigate_to(
        &mut self,
        target: usize,
        interaction: Option<&Ch::Interaction>,
    ) -> MenuResult<NavOutcome> {
        let view = self.paginator.render_page(&self.ctx, target).await?;
        let next = NavigationState {
            current_page: target,
            ..self.nav
        };
        let controls = ControlLayout::for_state(&next, self.total_pages());

        deliver(&mut self.channel, self.whisper, &view, &controls, target, interaction).await?;
        self.nav = next;

        debug!(owner_id = self.owner_id, page = target, "menu page changed");
        Ok(NavOutcome::Rendered { page: target })
    }

    // Stopping commits before delivery: a failed edit must not revive the menu.
    async fn stop_with(
        &mut self,
        interaction: Option<&Ch::Interaction>,
    ) -> MenuResult<NavOutcome> {
        if !self.is_active() {
            return Ok(NavOutcome::Ignored(IgnoreReason::Inactive));
        }

        self.nav.state = MenuState::Stopped;

        let page = self.nav.current_page;
        let view = self.paginator.render_page(&self.ctx, page).await?;
        let controls = self.controls();
        deliver(&mut self.channel, self.whisper, &view, &controls, page, interaction).await?;

        info!(owner_id = self.owner_id, page, "menu stopped");
        Ok(NavOutcome::Stopped)
    }
}

/// Pick the delivery primitive for this render and run it.
async fn deliver<V, Ch>(
    channel: &mut Ch,
    whisper: bool,
    view: &V,
    controls: &ControlLayout,
    page: usize,
    interaction: Option<&Ch::Interaction>,
) -> MenuResult<()>
where
    V: Sync,
    Ch: ResponseChannel<V>,
{
    let result = match (channel.mode(), interaction) {
        (ChannelMode::Interaction, Some(interaction)) => {
            channel
                .edit_existing(EditTarget::Interaction(interaction), view, controls)
                .await
        }
        (ChannelMode::Interaction, None) if channel.is_already_responded() => {
            channel
                .edit_existing(EditTarget::OriginalResponse, view, controls)
                .await
        }
        (ChannelMode::Interaction, None) => channel.send_new(view, controls, whisper).await,
        (ChannelMode::Plain, _) if channel.is_already_responded() => {
            channel
                .edit_existing(EditTarget::Message, view, controls)
                .await
        }
        (ChannelMode::Plain, _) => channel.send_new(view, controls, false).await,
    };

    result.map_err(|source| MenuError::ChannelDeliveryFailure { page, source })
}
