//! Owned binary audio payload.

use crate::error::CozeError;
use crate::execution::http::transport::BodyStream;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, Fuse};
use futures::{Stream, StreamExt, TryStreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

/// Streaming audio returned by speech synthesis.
///
/// The stream holds the underlying connection until it is read to the end,
/// closed, or dropped. `close` may be called any number of times.
pub struct AudioStream {
    inner: Option<Fuse<BodyStream>>,
    content_type: Option<String>,
}

impl std::fmt::Debug for AudioStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioStream")
            .field("content_type", &self.content_type)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl AudioStream {
    pub fn new(body: BodyStream, content_type: Option<String>) -> Self {
        Self {
            inner: Some(body.fuse()),
            content_type,
        }
    }

    /// An in-memory stream, handy for mocking speech services.
    pub fn from_bytes(data: impl Into<Bytes>, content_type: Option<String>) -> Self {
        let data: Bytes = data.into();
        Self::new(stream::once(async move { Ok(data) }).boxed(), content_type)
    }

    /// `Content-Type` the service reported for the payload.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Release the underlying body. Idempotent.
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            tracing::trace!(target: "coze::audio", "audio stream closed");
        }
    }

    /// Read the rest of the payload into memory.
    pub async fn read_all(&mut self) -> Result<Bytes, CozeError> {
        let inner = self.inner.as_mut().ok_or(CozeError::StreamClosed)?;
        let mut buf = BytesMut::new();
        while let Some(chunk) = inner.try_next().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }

    /// Copy the rest of the payload into `writer`, returning the byte count.
    ///
    /// Body failures keep their transport classification; a failing writer
    /// surfaces as `CozeError::IoError`.
    pub async fn write_to<W>(&mut self, writer: &mut W) -> Result<u64, CozeError>
    where
        W: AsyncWrite + Unpin,
    {
        let inner = self.inner.as_mut().ok_or(CozeError::StreamClosed)?;
        let mut written = 0u64;
        while let Some(chunk) = inner.try_next().await? {
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;
        Ok(written)
    }

    /// Adapt into a `tokio::io::AsyncRead`.
    pub fn into_async_read(self) -> impl AsyncRead + Send + Unpin {
        tokio_util::io::StreamReader::new(self.map_err(std::io::Error::other))
    }
}

impl Stream for AudioStream {
    type Item = Result<Bytes, CozeError>;

    /// A closed stream reports end-of-stream.
    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.inner.as_mut() {
            Some(inner) => inner.poll_next_unpin(cx),
            None => Poll::Ready(None),
        }
    }
}
