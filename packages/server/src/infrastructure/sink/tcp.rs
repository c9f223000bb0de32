//! TCP implementation of `PeerSink`.

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, net::tcp::OwnedWriteHalf, sync::Mutex};

use crate::domain::{PeerSink, SendError};

/// Owned write half of an accepted TCP stream.
///
/// The mutex serializes concurrent broadcasts to the same peer so that two
/// payloads never interleave on the wire. Closing takes the half out, which
/// shuts down the write direction and makes later sends fail with
/// [`SendError::Closed`].
pub struct TcpPeerSink {
    writer: Mutex<Option<OwnedWriteHalf>>,
}

impl TcpPeerSink {
    pub fn new(writer: OwnedWriteHalf) -> Self {
        Self {
            writer: Mutex::new(Some(writer)),
        }
    }
}

#[async_trait]
impl PeerSink for TcpPeerSink {
    async fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        let mut writer = self.writer.lock().await;
        let writer = writer.as_mut().ok_or(SendError::Closed)?;
        writer.write_all(payload).await?;
        Ok(())
    }

    async fn close(&self) {
        let writer = self.writer.lock().await.take();
        if let Some(mut writer) = writer
            && let Err(e) = writer.shutdown().await
        {
            tracing::debug!("Ignoring error while shutting down TCP writer: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::AsyncReadExt,
        net::{TcpListener, TcpStream},
    };

    async fn connected_pair() -> (TcpPeerSink, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).await.unwrap();
        let (server, _) = listener.accept().await.unwrap();
        let (_reader, writer) = server.into_split();
        (TcpPeerSink::new(writer), client)
    }

    #[tokio::test]
    async fn test_send_writes_whole_payload() {
        // テスト項目: send したバイト列がそのまま相手に届く
        // given (前提条件):
        let (sink, mut client) = connected_pair().await;

        // when (操作):
        sink.send(b"hello").await.unwrap();

        // then (期待する結果):
        let mut buf = [0u8; 5];
        client.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"hello");
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_rejects_later_sends() {
        // テスト項目: close は冪等で、close 後の send は Closed エラーになる
        // given (前提条件):
        let (sink, mut client) = connected_pair().await;

        // when (操作):
        sink.close().await;
        sink.close().await;
        let result = sink.send(b"late").await;

        // then (期待する結果):
        assert!(matches!(result, Err(SendError::Closed)));
        let mut buf = Vec::new();
        let n = client.read_to_end(&mut buf).await.unwrap();
        assert_eq!(n, 0);
    }
}
