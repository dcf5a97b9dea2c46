//! SSH transport for the [`SessionClient`] seam, built on `russh`.
//!
//! The command runs on an exec channel rather than an interactive shell, so
//! there is no prompt matching or pager handling: the device closes the
//! channel once the command has printed everything.

use std::sync::Arc;

use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::{ChannelMsg, Disconnect};
use russh_keys::key::PublicKey;
use tokio::time::timeout;
use tracing::{debug, trace};

use super::{CommandOutput, DeviceTarget, SessionClient, SessionError, SessionStage};

/// Fleet devices are not in any known-hosts store; every host key is accepted.
struct AcceptAnyHostKey;

#[async_trait]
impl client::Handler for AcceptAnyHostKey {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SshSessionClient;

impl SshSessionClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionClient for SshSessionClient {
    async fn run_command(&self, target: &DeviceTarget) -> Result<CommandOutput, SessionError> {
        let settings = target.settings;
        let config = Arc::new(client::Config {
            inactivity_timeout: Some(settings.read_timeout),
            ..Default::default()
        });

        let connecting = client::connect(
            config,
            (target.address.as_str(), settings.port),
            AcceptAnyHostKey,
        );
        let mut handle = match timeout(settings.connect_timeout, connecting).await {
            Ok(Ok(handle)) => handle,
            Ok(Err(e)) => return Err(SessionError::Connect(e)),
            Err(_elapsed) => {
                return Err(SessionError::Timeout {
                    stage: SessionStage::Connect,
                    after: settings.connect_timeout,
                });
            }
        };

        let result = exchange(&mut handle, target).await;

        // Runs after success and failure alike; dropping the handle closes
        // the transport if the goodbye itself fails.
        if let Err(e) = handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
        {
            trace!(address = %target.address, error = %e, "Disconnect failed");
        }

        result
    }
}

async fn exchange(
    handle: &mut Handle<AcceptAnyHostKey>,
    target: &DeviceTarget,
) -> Result<CommandOutput, SessionError> {
    let settings = target.settings;
    let creds = &target.credentials;

    let authenticated = timeout(
        settings.connect_timeout,
        handle.authenticate_password(creds.username.clone(), creds.password()),
    )
    .await
    .map_err(|_| SessionError::Timeout {
        stage: SessionStage::Authenticate,
        after: settings.connect_timeout,
    })??;

    if !authenticated {
        return Err(SessionError::AuthRejected(creds.username.clone()));
    }

    let reading = async {
        let mut channel = handle.channel_open_session().await?;
        channel.exec(true, target.command.as_str()).await?;

        let mut buf: Vec<u8> = Vec::new();
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => buf.extend_from_slice(data),
                ChannelMsg::ExitStatus { exit_status } if exit_status != 0 => {
                    debug!(address = %target.address, exit_status, "Command exited non-zero");
                }
                ChannelMsg::Failure => {
                    return Err(SessionError::Command("exec request refused".to_string()));
                }
                ChannelMsg::Eof | ChannelMsg::Close => break,
                _ => {}
            }
        }
        Ok::<Vec<u8>, SessionError>(buf)
    };

    let bytes = timeout(settings.read_timeout, reading)
        .await
        .map_err(|_| SessionError::Timeout {
            stage: SessionStage::Read,
            after: settings.read_timeout,
        })??;

    let text = String::from_utf8_lossy(&bytes).into_owned();
    debug!(
        address = %target.address,
        class = %target.class,
        command = %target.command,
        output = %text,
        "Command output"
    );
    Ok(CommandOutput(text))
}
