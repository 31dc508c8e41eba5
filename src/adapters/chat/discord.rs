//! Discord implementation of the chat gateway port.
//!
//! One websocket connection to the Discord gateway (identify,
//! heartbeat, dispatch) plus plain REST calls for threads and
//! messages. Reconnection is the caller's concern: when the socket
//! dies `run` returns and the connection manager decides what happens
//! next.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;

use crate::config::ChatConfig;
use crate::ports::{ChatError, ChatGateway, MentionEvent};

/// GUILDS | GUILD_MESSAGES | MESSAGE_CONTENT.
const INTENTS: u64 = 33281;

const OP_DISPATCH: u64 = 0;
const OP_HEARTBEAT: u64 = 1;
const OP_IDENTIFY: u64 = 2;
const OP_HELLO: u64 = 10;

pub struct DiscordGateway {
    token: Secret<String>,
    gateway_url: String,
    api_base: String,
    client: reqwest::Client,
}

impl DiscordGateway {
    /// Fails when the channel is enabled without a bot token.
    pub fn from_config(config: &ChatConfig) -> Result<Self, ChatError> {
        let token = config
            .bot_token()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ChatError::Connection("bot token is not configured".to_string()))?;
        Ok(Self {
            token: Secret::new(token.to_string()),
            gateway_url: config.gateway_url.clone(),
            api_base: config.api_base.clone(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .map_err(|e| ChatError::Connection(e.to_string()))?,
        })
    }

    async fn rest_post(&self, path: &str, body: Value) -> Result<Value, ChatError> {
        let response = self
            .client
            .post(format!("{}{}", self.api_base, path))
            .header(
                "Authorization",
                format!("Bot {}", self.token.expose_secret()),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Rest(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ChatError::Rest(format!(
                "{} returned {}",
                path,
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| ChatError::Rest(e.to_string()))
    }
}

#[async_trait]
impl ChatGateway for DiscordGateway {
    async fn run(&self, events: mpsc::Sender<MentionEvent>) -> Result<(), ChatError> {
        let (socket, _) = connect_async(&self.gateway_url)
            .await
            .map_err(|e| ChatError::Connection(e.to_string()))?;
        let (write, mut read) = socket.split();
        let write = Arc::new(Mutex::new(write));
        let last_seq = Arc::new(AtomicI64::new(-1));

        // Hello comes first and carries the heartbeat interval.
        let hello = read_payload(&mut read).await?;
        if hello.op != OP_HELLO {
            return Err(ChatError::Connection(format!(
                "expected hello, got op {}",
                hello.op
            )));
        }
        let interval_ms = hello
            .data
            .get("heartbeat_interval")
            .and_then(Value::as_u64)
            .ok_or_else(|| ChatError::Connection("hello without heartbeat_interval".to_string()))?;

        let heartbeat = tokio::spawn(heartbeat_loop(
            write.clone(),
            last_seq.clone(),
            Duration::from_millis(interval_ms),
        ));

        let identify = json!({
            "op": OP_IDENTIFY,
            "d": {
                "token": self.token.expose_secret(),
                "intents": INTENTS,
                "properties": { "os": "linux", "browser": "ragnet", "device": "ragnet" }
            }
        });
        send_json(&write, &identify).await?;

        let mut bot_user_id: Option<String> = None;
        let result = loop {
            let payload = match read_payload(&mut read).await {
                Ok(payload) => payload,
                Err(err) => break Err(err),
            };
            if let Some(seq) = payload.seq {
                last_seq.store(seq, Ordering::Relaxed);
            }
            if payload.op != OP_DISPATCH {
                continue;
            }

            match payload.event.as_deref() {
                Some("READY") => {
                    bot_user_id = payload
                        .data
                        .pointer("/user/id")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    tracing::info!("chat gateway ready");
                }
                Some("MESSAGE_CREATE") => {
                    let Some(bot_id) = bot_user_id.as_deref() else {
                        continue;
                    };
                    if let Some(mention) = mention_from_dispatch(&payload.data, bot_id) {
                        if events.send(mention).await.is_err() {
                            break Ok(());
                        }
                    }
                }
                _ => {}
            }
        };

        heartbeat.abort();
        result
    }

    async fn start_thread(
        &self,
        channel_id: &str,
        message_id: &str,
        title: &str,
    ) -> Result<String, ChatError> {
        let body = json!({ "name": title });
        let thread = self
            .rest_post(
                &format!("/channels/{}/messages/{}/threads", channel_id, message_id),
                body,
            )
            .await?;
        thread
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ChatError::Rest("thread response missing id".to_string()))
    }

    async fn post_message(&self, channel_id: &str, content: &str) -> Result<(), ChatError> {
        self.rest_post(
            &format!("/channels/{}/messages", channel_id),
            json!({ "content": content }),
        )
        .await
        .map(|_| ())
    }

    async fn reply(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> Result<(), ChatError> {
        self.rest_post(
            &format!("/channels/{}/messages", channel_id),
            json!({
                "content": content,
                "message_reference": { "message_id": message_id }
            }),
        )
        .await
        .map(|_| ())
    }
}

struct GatewayPayload {
    op: u64,
    seq: Option<i64>,
    event: Option<String>,
    data: Value,
}

async fn read_payload<S>(read: &mut S) -> Result<GatewayPayload, ChatError>
where
    S: StreamExt<Item = Result<WsMessage, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let message = match read.next().await {
            Some(Ok(message)) => message,
            Some(Err(err)) => return Err(ChatError::Connection(err.to_string())),
            None => return Err(ChatError::Closed("socket stream ended".to_string())),
        };
        let text = match message {
            WsMessage::Text(text) => text,
            WsMessage::Close(frame) => {
                return Err(ChatError::Closed(
                    frame
                        .map(|f| f.reason.to_string())
                        .unwrap_or_else(|| "no close reason".to_string()),
                ))
            }
            // Pings are answered by tungstenite itself.
            _ => continue,
        };

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| ChatError::Connection(format!("unreadable payload: {}", e)))?;
        return Ok(GatewayPayload {
            op: value.get("op").and_then(Value::as_u64).unwrap_or(u64::MAX),
            seq: value.get("s").and_then(Value::as_i64),
            event: value.get("t").and_then(Value::as_str).map(str::to_string),
            data: value.get("d").cloned().unwrap_or(Value::Null),
        });
    }
}

type WsSink = futures::stream::SplitSink<
    tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    WsMessage,
>;

async fn send_json(write: &Arc<Mutex<WsSink>>, value: &Value) -> Result<(), ChatError> {
    write
        .lock()
        .await
        .send(WsMessage::Text(value.to_string()))
        .await
        .map_err(|e| ChatError::Connection(e.to_string()))
}

async fn heartbeat_loop(write: Arc<Mutex<WsSink>>, last_seq: Arc<AtomicI64>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let seq = last_seq.load(Ordering::Relaxed);
        let payload = json!({
            "op": OP_HEARTBEAT,
            "d": if seq < 0 { Value::Null } else { json!(seq) }
        });
        if send_json(&write, &payload).await.is_err() {
            return;
        }
    }
}

/// Extracts a mention event from a MESSAGE_CREATE dispatch: the bot
/// must be mentioned, the author must be someone else, and the mention
/// markup is stripped from the content.
fn mention_from_dispatch(data: &Value, bot_id: &str) -> Option<MentionEvent> {
    let author_id = data.pointer("/author/id").and_then(Value::as_str)?;
    if author_id == bot_id {
        return None;
    }
    let mentioned = data
        .get("mentions")
        .and_then(Value::as_array)?
        .iter()
        .any(|m| m.get("id").and_then(Value::as_str) == Some(bot_id));
    if !mentioned {
        return None;
    }

    let content = data.get("content").and_then(Value::as_str)?;
    let content = content
        .replace(&format!("<@{}>", bot_id), "")
        .replace(&format!("<@!{}>", bot_id), "")
        .trim()
        .to_string();

    Some(MentionEvent {
        channel_id: data.get("channel_id").and_then(Value::as_str)?.to_string(),
        message_id: data.get("id").and_then(Value::as_str)?.to_string(),
        author: data
            .pointer("/author/username")
            .and_then(Value::as_str)
            .unwrap_or(author_id)
            .to_string(),
        content,
    })
}
