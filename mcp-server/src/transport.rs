//! Transport layer for MCP: newline-delimited JSON-RPC messages
use async_channel::{Receiver, Sender};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

/// MCP Transport abstraction
#[async_trait::async_trait]
pub trait Transport: Send {
    /// Next inbound message, or `None` once the peer has closed the stream
    async fn read_message(&mut self) -> anyhow::Result<Option<String>>;

    /// Write one outbound message
    async fn write_message(&mut self, message: &str) -> anyhow::Result<()>;
}

/// Line-delimited JSON over the process's stdin/stdout
pub struct StdioTransport {
    lines: Lines<BufReader<Stdin>>,
    stdout: Stdout,
}

impl StdioTransport {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            stdout: tokio::io::stdout(),
        }
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Transport for StdioTransport {
    async fn read_message(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }

    async fn write_message(&mut self, message: &str) -> anyhow::Result<()> {
        self.stdout.write_all(message.as_bytes()).await?;
        self.stdout.write_all(b"\n").await?;
        self.stdout.flush().await?;
        Ok(())
    }
}

/// In-process transport over channels; closing the sender ends the session
pub struct ChannelTransport {
    inbound: Receiver<String>,
    outbound: Sender<String>,
}

impl ChannelTransport {
    /// Returns the transport plus the client's ends: (requests in, responses out)
    pub fn pair() -> (Self, Sender<String>, Receiver<String>) {
        let (request_tx, request_rx) = async_channel::unbounded();
        let (response_tx, response_rx) = async_channel::unbounded();
        let transport = Self {
            inbound: request_rx,
            outbound: response_tx,
        };
        (transport, request_tx, response_rx)
    }
}

#[async_trait::async_trait]
impl Transport for ChannelTransport {
    async fn read_message(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.inbound.recv().await.ok())
    }

    async fn write_message(&mut self, message: &str) -> anyhow::Result<()> {
        self.outbound
            .send(message.to_string())
            .await
            .map_err(|_| anyhow::anyhow!("response channel closed"))
    }
}
