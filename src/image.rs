use futures::channel::oneshot;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::{EditorError, EditorResult};
use crate::layer::LayerImage;

/// Decodes an encoded image file (PNG, JPEG, GIF, WebP, BMP) into a layer image.
pub fn decode_image(bytes: &[u8]) -> EditorResult<LayerImage> {
    let decoded = image::load_from_memory(bytes).map_err(EditorError::ImageDecode)?;
    let rgba = decoded.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(EditorError::EmptyImage);
    }
    log::debug!("Decoded image: {}x{}", rgba.width(), rgba.height());
    Ok(LayerImage::new(rgba))
}

/// A single-shot image decode that completes at most once.
///
/// Until it resolves the image belongs to no layer. Poll it from the UI loop with
/// [`PendingImage::try_take`], or `.await` it.
pub struct PendingImage {
    name: String,
    receiver: oneshot::Receiver<EditorResult<LayerImage>>,
}

impl std::fmt::Debug for PendingImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingImage").field("name", &self.name).finish()
    }
}

impl PendingImage {
    /// Starts decoding `bytes`. Native builds decode on a worker thread; the web
    /// build has no threads and decodes before returning.
    pub fn spawn(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let (sender, receiver) = oneshot::channel();
        let name = name.into();

        #[cfg(not(target_arch = "wasm32"))]
        {
            let thread_name = format!("decode {name}");
            let spawned = std::thread::Builder::new().name(thread_name).spawn(move || {
                // The receiver may already be gone; nothing to report then.
                let _ = sender.send(decode_image(&bytes));
            });
            if let Err(err) = spawned {
                // The sender was dropped with the closure, so the receiver reports cancellation.
                log::warn!("Failed to spawn decode thread for {name}: {err}");
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let _ = sender.send(decode_image(&bytes));
        }

        Self { name, receiver }
    }

    /// Wraps an already-known outcome, e.g. for a file that failed to read.
    pub fn ready(name: impl Into<String>, result: EditorResult<LayerImage>) -> Self {
        let (sender, receiver) = oneshot::channel();
        let _ = sender.send(result);
        Self {
            name: name.into(),
            receiver,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the outcome once the decode has finished, `None` while still running.
    pub fn try_take(&mut self) -> Option<EditorResult<LayerImage>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(EditorError::DecodeCancelled)),
        }
    }
}

impl Future for PendingImage {
    type Output = EditorResult<LayerImage>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.unwrap_or(Err(EditorError::DecodeCancelled)))
    }
}
