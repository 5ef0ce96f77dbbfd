//! The response channel a menu delivers its pages through.

use async_trait::async_trait;

use crate::controls::ControlLayout;

/// How the menu reached the user.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChannelMode {
    /// Backed by an application-command interaction and its response.
    Interaction,
    /// A regular channel message.
    Plain,
}

/// What an edit should update.
#[derive(Debug)]
pub enum EditTarget<'a, I> {
    /// Answer a just-received button interaction by updating its message.
    Interaction(&'a I),
    /// Edit the response already sent for the interaction.
    OriginalResponse,
    /// Edit the plain message owned by the channel.
    Message,
}

/// Delivery primitives used by a menu session.
///
/// Implementations only execute the primitive they are asked for. Choosing
/// between a new response and an edit is the session's job.
#[async_trait]
pub trait ResponseChannel<V>: Send
where
    V: Sync,
{
    /// Component interaction type carried by button presses.
    type Interaction: Send + Sync;

    fn mode(&self) -> ChannelMode;

    /// Whether a message or response already exists for this menu.
    fn is_already_responded(&self) -> bool;

    async fn send_new(
        &mut self,
        view: &V,
        controls: &ControlLayout,
        ephemeral: bool,
    ) -> anyhow::Result<()>;

    async fn edit_existing(
        &mut self,
        target: EditTarget<'_, Self::Interaction>,
        view: &V,
        controls: &ControlLayout,
    ) -> anyhow::Result<()>;

    /// Acknowledge a button press that was not answered by a render.
    async fn acknowledge(&mut self, _interaction: &Self::Interaction) -> anyhow::Result<()> {
        Ok(())
    }
}
