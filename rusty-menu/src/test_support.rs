//! In-memory channel and formatter stubs shared by unit tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use crate::channel::{ChannelMode, EditTarget, ResponseChannel};
use crate::controls::ControlLayout;
use crate::paginator::{FnFormatter, formatter_fn};

/// Interaction stand-in: just the token of the button press.
pub type TestInteraction = u64;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Delivery {
    SendNew {
        view: String,
        controls: ControlLayout,
        ephemeral: bool,
    },
    EditInteraction {
        token: TestInteraction,
        view: String,
        controls: ControlLayout,
    },
    EditOriginal {
        view: String,
        controls: ControlLayout,
    },
    EditMessage {
        view: String,
        controls: ControlLayout,
    },
}

impl Delivery {
    pub fn view(&self) -> &str {
        match self {
            Delivery::SendNew { view, .. }
            | Delivery::EditInteraction { view, .. }
            | Delivery::EditOriginal { view, .. }
            | Delivery::EditMessage { view, .. } => view,
        }
    }

    pub fn controls(&self) -> &ControlLayout {
        match self {
            Delivery::SendNew { controls, .. }
            | Delivery::EditInteraction { controls, .. }
            | Delivery::EditOriginal { controls, .. }
            | Delivery::EditMessage { controls, .. } => controls,
        }
    }
}

pub type DeliveryLog = Arc<Mutex<Vec<Delivery>>>;

pub struct RecordingChannel {
    mode: ChannelMode,
    responded: bool,
    fail_next: Arc<Mutex<bool>>,
    log: DeliveryLog,
    acks: Arc<Mutex<Vec<TestInteraction>>>,
}

impl RecordingChannel {
    pub fn interaction() -> Self {
        Self::with_mode(ChannelMode::Interaction, false)
    }

    pub fn plain(existing_message: bool) -> Self {
        Self::with_mode(ChannelMode::Plain, existing_message)
    }

    fn with_mode(mode: ChannelMode, responded: bool) -> Self {
        Self {
            mode,
            responded,
            fail_next: Arc::new(Mutex::new(false)),
            log: Arc::new(Mutex::new(Vec::new())),
            acks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn log(&self) -> DeliveryLog {
        Arc::clone(&self.log)
    }

    /// Interactions acknowledged without a render.
    pub fn acks(&self) -> Arc<Mutex<Vec<TestInteraction>>> {
        Arc::clone(&self.acks)
    }

    /// Make the next delivery fail once.
    pub fn fail_switch(&self) -> Arc<Mutex<bool>> {
        Arc::clone(&self.fail_next)
    }

    fn record(&mut self, delivery: Delivery) -> anyhow::Result<()> {
        let mut fail_next = self.fail_next.lock().unwrap();
        if *fail_next {
            *fail_next = false;
            anyhow::bail!("simulated delivery failure");
        }
        self.log.lock().unwrap().push(delivery);
        Ok(())
    }
}

#[async_trait]
impl ResponseChannel<String> for RecordingChannel {
    type Interaction = TestInteraction;

    fn mode(&self) -> ChannelMode {
        self.mode
    }

    fn is_already_responded(&self) -> bool {
        self.responded
    }

    async fn send_new(
        &mut self,
        view: &String,
        controls: &ControlLayout,
        ephemeral: bool,
    ) -> anyhow::Result<()> {
        self.record(Delivery::SendNew {
            view: view.clone(),
            controls: controls.clone(),
            ephemeral,
        })?;
        self.responded = true;
        Ok(())
    }

    async fn edit_existing(
        &mut self,
        target: EditTarget<'_, TestInteraction>,
        view: &String,
        controls: &ControlLayout,
    ) -> anyhow::Result<()> {
        let view = view.clone();
        let controls = controls.clone();
        let delivery = match target {
            EditTarget::Interaction(token) => Delivery::EditInteraction {
                token: *token,
                view,
                controls,
            },
            EditTarget::OriginalResponse => Delivery::EditOriginal { view, controls },
            EditTarget::Message => Delivery::EditMessage { view, controls },
        };
        self.record(delivery)
    }

    async fn acknowledge(&mut self, interaction: &TestInteraction) -> anyhow::Result<()> {
        self.acks.lock().unwrap().push(*interaction);
        Ok(())
    }
}

/// Formatter rendering `page N` and counting invocations.
pub fn counting_formatter(
    calls: Arc<AtomicUsize>,
) -> FnFormatter<impl Fn(&(), &[u32], usize, &[Vec<u32>]) -> anyhow::Result<String>> {
    formatter_fn(move |_: &(), entries: &[u32], page: usize, _: &[Vec<u32>]| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("page {page} ({} entries)", entries.len()))
    })
}
