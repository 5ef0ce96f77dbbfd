//! Response channels backed by the Discord HTTP API.

use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client;
use twilight_model::{
    channel::message::{MessageFlags, embed::Embed},
    gateway::payload::incoming::InteractionCreate,
    http::interaction::{InteractionResponse, InteractionResponseType},
    id::{
        Id,
        marker::{ApplicationMarker, ChannelMarker, InteractionMarker, MessageMarker},
    },
};
use twilight_util::builder::InteractionResponseDataBuilder;

use super::components::build_menu_components;
use super::respond::{defer_component_update, respond_update_message};
use crate::channel::{ChannelMode, EditTarget, ResponseChannel};
use crate::controls::ControlLayout;

/// Menu delivered as the response to an application command.
pub struct InteractionChannel {
    http: Arc<Client>,
    session_id: u64,
    application_id: Id<ApplicationMarker>,
    interaction_id: Id<InteractionMarker>,
    /// Token of the latest interaction answered for this menu.
    token: String,
    responded: bool,
}

impl InteractionChannel {
    pub fn new(http: Arc<Client>, session_id: u64, interaction: &InteractionCreate) -> Self {
        Self {
            http,
            session_id,
            application_id: interaction.application_id,
            interaction_id: interaction.id,
            token: interaction.token.clone(),
            responded: false,
        }
    }
}

#[async_trait]
impl ResponseChannel<Embed> for InteractionChannel {
    type Interaction = InteractionCreate;

    fn mode(&self) -> ChannelMode {
        ChannelMode::Interaction
    }

    fn is_already_responded(&self) -> bool {
        self.responded
    }

    async fn send_new(
        &mut self,
        view: &Embed,
        controls: &ControlLayout,
        ephemeral: bool,
    ) -> anyhow::Result<()> {
        let mut data = InteractionResponseDataBuilder::new()
            .embeds([view.clone()])
            .components(build_menu_components(self.session_id, controls));
        if ephemeral {
            data = data.flags(MessageFlags::EPHEMERAL);
        }

        let response = InteractionResponse {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(data.build()),
        };

        self.http
            .interaction(self.application_id)
            .create_response(self.interaction_id, &self.token, &response)
            .await?;

        self.responded = true;
        Ok(())
    }

    async fn edit_existing(
        &mut self,
        target: EditTarget<'_, InteractionCreate>,
        view: &Embed,
        controls: &ControlLayout,
    ) -> anyhow::Result<()> {
        let components = build_menu_components(self.session_id, controls);

        match target {
            EditTarget::Interaction(interaction) => {
                respond_update_message(
                    &self.http,
                    interaction,
                    std::slice::from_ref(view),
                    &components,
                )
                .await?;
                // Later edits (timeout) go through the newest token.
                self.token = interaction.token.clone();
                self.responded = true;
            }
            EditTarget::OriginalResponse => {
                self.http
                    .interaction(self.application_id)
                    .update_response(&self.token)
                    .embeds(Some(std::slice::from_ref(view)))
                    .components(Some(&components))
                    .await?;
            }
            EditTarget::Message => {
                anyhow::bail!("interaction menus do not own a plain message");
            }
        }

        Ok(())
    }

    async fn acknowledge(&mut self, interaction: &InteractionCreate) -> anyhow::Result<()> {
        defer_component_update(&self.http, interaction).await
    }
}

/// Menu delivered as a regular channel message.
pub struct PlainChannel {
    http: Arc<Client>,
    session_id: u64,
    channel_id: Id<ChannelMarker>,
    message_id: Option<Id<MessageMarker>>,
}

impl PlainChannel {
    /// `existing` is a message to take over instead of posting a new one.
    pub fn new(
        http: Arc<Client>,
        session_id: u64,
        channel_id: Id<ChannelMarker>,
        existing: Option<Id<MessageMarker>>,
    ) -> Self {
        Self {
            http,
            session_id,
            channel_id,
            message_id: existing,
        }
    }

    pub fn message_id(&self) -> Option<Id<MessageMarker>> {
        self.message_id
    }
}

#[async_trait]
impl ResponseChannel<Embed> for PlainChannel {
    type Interaction = InteractionCreate;

    fn mode(&self) -> ChannelMode {
        ChannelMode::Plain
    }

    fn is_already_responded(&self) -> bool {
        self.message_id.is_some()
    }

    async fn send_new(
        &mut self,
        view: &Embed,
        controls: &ControlLayout,
        _ephemeral: bool,
    ) -> anyhow::Result<()> {
        let components = build_menu_components(self.session_id, controls);
        let created_message = self
            .http
            .create_message(self.channel_id)
            .embeds(std::slice::from_ref(view))
            .components(&components)
            .await?
            .model()
            .await?;

        self.message_id = Some(created_message.id);
        Ok(())
    }

    async fn edit_existing(
        &mut self,
        _target: EditTarget<'_, InteractionCreate>,
        view: &Embed,
        controls: &ControlLayout,
    ) -> anyhow::Result<()> {
        let Some(message_id) = self.message_id else {
            anyhow::bail!("no menu message to edit yet");
        };

        let components = build_menu_components(self.session_id, controls);
        self.http
            .update_message(self.channel_id, message_id)
            .content(None)
            .embeds(Some(std::slice::from_ref(view)))
            .components(Some(&components))
            .await?;

        Ok(())
    }

    async fn acknowledge(&mut self, interaction: &InteractionCreate) -> anyhow::Result<()> {
        defer_component_update(&self.http, interaction).await
    }
}
