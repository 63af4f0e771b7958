use std::{
    collections::{HashMap, HashSet},
    net::SocketAddr,
    sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    context::{ChannelContext, Client, ClientContext, ReplySender},
    error::Error,
    result::Result,
};

/// Connected clients and the channel table, behind one lock.
///
/// Every operation that touches membership updates both maps inside the same
/// critical section, so no caller can observe a client listed in a channel
/// it has left or a member identity with no client behind it.
#[derive(Default)]
pub struct Registry {
    state: Mutex<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    connections: HashMap<Uuid, ClientContext>,
    channels: HashMap<String, ChannelContext>,
}

impl RegistryState {
    fn members(&self, name: &str) -> Option<&HashSet<Uuid>> {
        self.channels.get(name).map(|c| &c.members)
    }
}

/// Prefixes `#` when the name does not already start with it.
pub fn normalize_channel_name(name: &str) -> String {
    if name.starts_with('#') {
        name.to_string()
    } else {
        format!("#{}", name)
    }
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        match self.state.lock() {
            Ok(s) => s,
            Err(e) => {
                warn!("Registry lock was poisoned, continuing with the inner state");
                e.into_inner()
            }
        }
    }

    pub fn register(
        &self,
        connection_id: Uuid,
        sender: ReplySender,
        client_host: Option<SocketAddr>,
    ) -> Result<Client> {
        let mut state = self.lock();

        if state.connections.contains_key(&connection_id) {
            return Err(Error::DuplicateConnection(connection_id));
        }

        let ctx = ClientContext {
            connection_id,
            nick: String::new(),
            channel: String::new(),
            client_host,
            connected_at: Utc::now(),
            sender,
        };
        let client = Client::from(&ctx);
        state.connections.insert(connection_id, ctx);

        Ok(client)
    }

    pub fn set_nickname(&self, connection_id: Uuid, nick: &str) -> Result<Client> {
        let mut state = self.lock();

        let ctx = state
            .connections
            .get_mut(&connection_id)
            .ok_or(Error::UnknownConnection(connection_id))?;
        ctx.nick = nick.to_string();

        Ok(Client::from(&*ctx))
    }

    /// Moves the client out of its previous channel and into `name`, creating
    /// the channel on first use. Returns the client as it is after the move.
    pub fn join_channel(&self, connection_id: Uuid, name: &str) -> Result<Client> {
        let channel = normalize_channel_name(name);
        let mut state = self.lock();
        let RegistryState {
            connections,
            channels,
        } = &mut *state;

        let ctx = connections
            .get_mut(&connection_id)
            .ok_or(Error::UnknownConnection(connection_id))?;

        if !ctx.channel.is_empty() {
            if let Some(previous) = channels.get_mut(&ctx.channel) {
                previous.members.remove(&connection_id);
            }
        }

        channels
            .entry(channel.clone())
            .or_default()
            .members
            .insert(connection_id);
        ctx.channel = channel;

        Ok(Client::from(&*ctx))
    }

    /// Removes the client and purges it from every channel. Called once, on disconnect.
    pub fn leave_all(&self, connection_id: Uuid) -> Option<ClientContext> {
        let mut state = self.lock();

        for (name, channel) in state.channels.iter_mut() {
            if channel.members.remove(&connection_id) {
                debug!(%connection_id, channel = %name, remaining = channel.members.len(), "Removed member from channel");
            }
        }

        state.connections.remove(&connection_id)
    }

    /// Snapshot of the member identities of `name`, `None` if nobody ever joined it.
    pub fn members_of(&self, name: &str) -> Option<HashSet<Uuid>> {
        self.lock().members(name).cloned()
    }

    /// The `members_of` snapshot paired with each member's outbound queue, in
    /// one critical section. This is what broadcast iterates.
    pub fn channel_senders(&self, name: &str) -> Option<Vec<(Uuid, ReplySender)>> {
        let state = self.lock();
        let members = state.members(name)?;

        let senders = members
            .iter()
            .filter_map(|member| match state.connections.get(member) {
                Some(ctx) => Some((*member, ctx.sender.clone())),
                None => {
                    warn!(%member, channel = %name, "Channel member has no connection context");
                    None
                }
            })
            .collect();

        Some(senders)
    }

    pub fn sender_of(&self, connection_id: Uuid) -> Option<ReplySender> {
        self.lock()
            .connections
            .get(&connection_id)
            .map(|ctx| ctx.sender.clone())
    }

    pub fn client(&self, connection_id: Uuid) -> Option<Client> {
        self.lock().connections.get(&connection_id).map(Client::from)
    }

    /// Number of connected clients.
    pub fn len(&self) -> usize {
        self.lock().connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn register_new(registry: &Registry) -> Uuid {
        let (sender, _receiver) = mpsc::channel(8);
        let connection_id = Uuid::new_v4();
        registry
            .register(connection_id, ReplySender(sender), None)
            .unwrap();
        connection_id
    }

    fn channels_containing(registry: &Registry, connection_id: Uuid) -> Vec<String> {
        let names: Vec<String> = registry.lock().channels.keys().cloned().collect();
        names
            .into_iter()
            .filter(|name| {
                registry
                    .members_of(name)
                    .map(|m| m.contains(&connection_id))
                    .unwrap_or(false)
            })
            .collect()
    }

    #[test]
    fn register_newconnection_hasemptynickandchannel() {
        let registry = Registry::new();
        let (sender, _receiver) = mpsc::channel(8);
        let connection_id = Uuid::new_v4();

        let client = registry
            .register(connection_id, ReplySender(sender), None)
            .unwrap();

        assert_eq!(connection_id, client.connection_id);
        assert_eq!("", client.nick);
        assert_eq!("", client.channel);
        assert_eq!(1, registry.len());
    }

    #[test]
    fn register_duplicateidentity_errors() {
        let registry = Registry::new();
        let connection_id = register_new(&registry);
        let (sender, _receiver) = mpsc::channel(8);

        let result = registry.register(connection_id, ReplySender(sender), None);

        assert!(matches!(result, Err(Error::DuplicateConnection(id)) if id == connection_id));
    }

    #[test]
    fn set_nickname_duplicatenicks_areaccepted() {
        let registry = Registry::new();
        let first = register_new(&registry);
        let second = register_new(&registry);

        registry.set_nickname(first, "alice").unwrap();
        registry.set_nickname(second, "alice").unwrap();

        assert_eq!("alice", registry.client(first).unwrap().nick);
        assert_eq!("alice", registry.client(second).unwrap().nick);
    }

    #[test]
    fn set_nickname_unknownconnection_errors() {
        let registry = Registry::new();
        let result = registry.set_nickname(Uuid::new_v4(), "alice");
        assert!(matches!(result, Err(Error::UnknownConnection(_))));
    }

    #[test]
    fn join_channel_missinghash_isprefixed() {
        let registry = Registry::new();
        let connection_id = register_new(&registry);

        let client = registry.join_channel(connection_id, "foo").unwrap();

        assert_eq!("#foo", client.channel);
        assert!(registry.members_of("#foo").unwrap().contains(&connection_id));
        assert!(registry.members_of("foo").is_none());
    }

    #[test]
    fn join_channel_sequenceofjoins_memberofonlylatest() {
        let registry = Registry::new();
        let connection_id = register_new(&registry);

        for name in &["#a", "b", "#c", "a", "#b"] {
            registry.join_channel(connection_id, name).unwrap();
            let expected = normalize_channel_name(name);

            assert_eq!(expected, registry.client(connection_id).unwrap().channel);
            assert_eq!(vec![expected], channels_containing(&registry, connection_id));
        }
    }

    #[test]
    fn join_channel_samechanneltwice_singlemembership() {
        let registry = Registry::new();
        let connection_id = register_new(&registry);

        registry.join_channel(connection_id, "#test").unwrap();
        registry.join_channel(connection_id, "#test").unwrap();

        assert_eq!(1, registry.members_of("#test").unwrap().len());
    }

    #[test]
    fn leave_all_removesfromregistryandchannels() {
        let registry = Registry::new();
        let leaving = register_new(&registry);
        let staying = register_new(&registry);
        registry.join_channel(leaving, "#test").unwrap();
        registry.join_channel(staying, "#test").unwrap();

        let removed = registry.leave_all(leaving);

        assert!(removed.is_some());
        assert!(registry.client(leaving).is_none());
        let members = registry.members_of("#test").unwrap();
        assert!(!members.contains(&leaving));
        assert!(members.contains(&staying));
        assert!(registry.leave_all(leaving).is_none());
    }

    #[test]
    fn leave_all_lastmember_channelremainsempty() {
        let registry = Registry::new();
        let connection_id = register_new(&registry);
        registry.join_channel(connection_id, "#test").unwrap();

        registry.leave_all(connection_id);

        assert_eq!(Some(HashSet::new()), registry.members_of("#test"));
        assert!(registry.channel_senders("#test").unwrap().is_empty());
    }

    #[test]
    fn channel_senders_matchesmembersof() {
        let registry = Registry::new();
        let first = register_new(&registry);
        let second = register_new(&registry);
        let elsewhere = register_new(&registry);
        registry.join_channel(first, "#test").unwrap();
        registry.join_channel(second, "#test").unwrap();
        registry.join_channel(elsewhere, "#other").unwrap();

        let senders: HashSet<Uuid> = registry
            .channel_senders("#test")
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        assert_eq!(registry.members_of("#test").unwrap(), senders);
        assert!(registry.channel_senders("#missing").is_none());
    }

    #[test]
    fn concurrent_joinsanddisconnects_keepinvariants() {
        let registry = Arc::new(Registry::new());
        let mut handles = vec![];

        for i in 0..16 {
            let registry = registry.clone();
            handles.push(std::thread::spawn(move || {
                let connection_id = register_new(&registry);
                for round in 0..50 {
                    let name = format!("#chan{}", (i + round) % 4);
                    registry.join_channel(connection_id, &name).unwrap();
                }
                if i % 2 == 0 {
                    registry.leave_all(connection_id);
                }
                connection_id
            }));
        }

        let ids: Vec<Uuid> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(8, registry.len());
        for (i, connection_id) in ids.into_iter().enumerate() {
            let containing = channels_containing(&registry, connection_id);
            if i % 2 == 0 {
                assert!(containing.is_empty());
            } else {
                let channel = registry.client(connection_id).unwrap().channel;
                assert_eq!(vec![channel], containing);
            }
        }
    }
}
