use std::collections::VecDeque;

use async_trait::async_trait;

#[async_trait]
pub trait ReceiverWrapper<T>
where
    T: Send,
{
    async fn receive(&mut self) -> Option<T>;
}

#[async_trait]
impl<T> ReceiverWrapper<T> for tokio::sync::mpsc::Receiver<T>
where
    T: Send,
{
    async fn receive(&mut self) -> Option<T> {
        self.recv().await
    }
}

/// Test double that yields a fixed queue of messages and then reports closed.
pub struct FakeChannelReceiver<T>
where
    T: Send,
{
    pub faked_messages: Box<VecDeque<T>>,
    pub receive_count: i32,
}

impl<T> FakeChannelReceiver<T>
where
    T: Send,
{
    pub fn new<I: IntoIterator<Item = T>>(messages: I) -> Self {
        FakeChannelReceiver {
            faked_messages: Box::new(messages.into_iter().collect()),
            receive_count: 0,
        }
    }
}

#[async_trait]
impl<T> ReceiverWrapper<T> for FakeChannelReceiver<T>
where
    T: Send,
{
    async fn receive(&mut self) -> Option<T> {
        self.receive_count += 1;
        self.faked_messages.pop_front()
    }
}
