//! Chat thread and conversation summary persistence.
//!
//! Chat is locally simulated: a thread is an append-only message list under
//! `chat/thread:{peer}`, and the recent-chats list under `chat/conversations`
//! is a denormalized projection of each thread's tail.  A send writes both
//! inside one SQLite transaction, thread first, so the summary can never be
//! observed ahead of the message it previews.

use chrono::{DateTime, Local, Timelike};
use rusqlite::{params, OptionalExtension, Transaction};

use kindred_shared::constants::{JUST_NOW, SEED_OWN_MESSAGE, SEED_PEER_MESSAGE};
use kindred_shared::types::{ConversationSummary, Message, Sender};

use crate::database::{Database, NS_CHAT};
use crate::error::Result;

const CONVERSATIONS_KEY: &str = "conversations";

/// Recent chats shown before the user has talked to anyone.
fn default_conversations() -> Vec<ConversationSummary> {
    use kindred_shared::constants::DEFAULT_AVATAR_URL;
    vec![
        ConversationSummary {
            peer: "luism_dev".into(),
            avatar_url: DEFAULT_AVATAR_URL.into(),
            last_message_text: "Did you like Elden Ring?".into(),
            last_message_time: "2h".into(),
        },
        ConversationSummary {
            peer: "sof_lo".into(),
            avatar_url: DEFAULT_AVATAR_URL.into(),
            last_message_text: "Hey! Are you into Ghibli?".into(),
            last_message_time: "6h".into(),
        },
    ]
}

fn thread_key(peer: &str) -> String {
    format!("thread:{peer}")
}

/// The fixed two-message conversation a thread starts with.
fn seed_thread() -> Vec<Message> {
    let (peer_text, peer_time) = SEED_PEER_MESSAGE;
    let (own_text, own_time) = SEED_OWN_MESSAGE;
    vec![
        Message {
            id: 1,
            text: peer_text.into(),
            sender: Sender::Peer,
            time: peer_time.into(),
        },
        Message {
            id: 2,
            text: own_text.into(),
            sender: Sender::Me,
            time: own_time.into(),
        },
    ]
}

/// Wall-clock `H:MM`, 24-hour, zero-padded minutes.
fn clock_label(now: &DateTime<Local>) -> String {
    format!("{}:{:02}", now.hour(), now.minute())
}

impl Database {
    /// Load the thread for `peer`, seeding and persisting the default
    /// conversation on first access so subsequent reads are idempotent.
    pub fn load_thread(&self, peer: &str) -> Result<Vec<Message>> {
        let key = thread_key(peer);
        if let Some(messages) = self.get::<Vec<Message>>(NS_CHAT, &key)? {
            return Ok(messages);
        }

        let seeded = seed_thread();
        self.put(NS_CHAT, &key, &seeded)?;
        tracing::debug!(peer, "seeded new chat thread");
        Ok(seeded)
    }

    /// Append an own message to `peer`'s thread and re-derive the owning
    /// conversation summary, atomically.
    ///
    /// The message id is time-derived but always strictly greater than the
    /// last id in the thread, so insertion order and id order agree.
    pub fn append_message(
        &mut self,
        peer: &str,
        avatar_url: &str,
        text: &str,
        now: DateTime<Local>,
    ) -> Result<Message> {
        let key = thread_key(peer);
        let tx = self.conn_mut().transaction()?;

        let mut messages: Vec<Message> = match tx_get(&tx, NS_CHAT, &key)? {
            Some(json) => serde_json::from_str(&json)?,
            None => seed_thread(),
        };

        let last_id = messages.last().map(|m| m.id).unwrap_or(0);
        let message = Message {
            id: (now.timestamp_millis().max(0) as u64).max(last_id + 1),
            text: text.to_string(),
            sender: Sender::Me,
            time: clock_label(&now),
        };
        messages.push(message.clone());
        tx_put(&tx, NS_CHAT, &key, &serde_json::to_string(&messages)?)?;

        // Thread append above happens-before this projection.
        let mut conversations: Vec<ConversationSummary> =
            match tx_get(&tx, NS_CHAT, CONVERSATIONS_KEY)? {
                Some(json) => serde_json::from_str(&json)?,
                None => default_conversations(),
            };
        match conversations.iter_mut().find(|c| c.peer == peer) {
            Some(summary) => {
                summary.last_message_text = message.text.clone();
                summary.last_message_time = JUST_NOW.into();
            }
            None => conversations.insert(
                0,
                ConversationSummary {
                    peer: peer.to_string(),
                    avatar_url: avatar_url.to_string(),
                    last_message_text: message.text.clone(),
                    last_message_time: JUST_NOW.into(),
                },
            ),
        }
        tx_put(
            &tx,
            NS_CHAT,
            CONVERSATIONS_KEY,
            &serde_json::to_string(&conversations)?,
        )?;

        tx.commit()?;
        tracing::debug!(peer, msg_id = message.id, "message appended");
        Ok(message)
    }

    /// Load the recent-chats list, seeding the defaults on first access.
    pub fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        if let Some(conversations) =
            self.get::<Vec<ConversationSummary>>(NS_CHAT, CONVERSATIONS_KEY)?
        {
            return Ok(conversations);
        }

        let seeded = default_conversations();
        self.put(NS_CHAT, CONVERSATIONS_KEY, &seeded)?;
        Ok(seeded)
    }
}

fn tx_get(tx: &Transaction<'_>, ns: &str, key: &str) -> Result<Option<String>> {
    Ok(tx
        .query_row(
            "SELECT json FROM kv WHERE ns = ?1 AND key = ?2",
            params![ns, key],
            |row| row.get(0),
        )
        .optional()?)
}

fn tx_put(tx: &Transaction<'_>, ns: &str, key: &str, json: &str) -> Result<()> {
    tx.execute(
        "INSERT OR REPLACE INTO kv (ns, key, json) VALUES (?1, ?2, ?3)",
        params![ns, key, json],
    )?;
    Ok(())
}
