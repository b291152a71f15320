//! Owned OCR provider with a single reset-and-retry on failure.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use image::DynamicImage;
use tracing::{info, warn};

use crate::error::OcrError;

use super::{OcrProvider, OcrResult};

/// Builds a fresh provider. Called once at startup and again after a failure.
pub type ProviderFactory<P> = Box<dyn Fn() -> Result<P, OcrError>>;

/// An OCR provider together with the means to rebuild it.
///
/// When recognition fails, or the provider panics, the provider is dropped, a
/// new one is built through the factory and the image is retried once. The
/// second error, or an error from the factory, is returned to the caller.
///
/// The session is not `Send` when its provider is not; build it on the thread
/// that will use it.
pub struct OcrSession<P: OcrProvider> {
    provider: Option<P>,
    factory: ProviderFactory<P>,
    resets: u64,
}

impl<P: OcrProvider> OcrSession<P> {
    /// Build the initial provider through `factory`.
    pub fn new<F>(factory: F) -> Result<Self, OcrError>
    where
        F: Fn() -> Result<P, OcrError> + 'static,
    {
        let provider = guarded(OcrError::ModelLoad, &factory)?;
        Ok(Self {
            provider: Some(provider),
            factory: Box::new(factory),
            resets: 0,
        })
    }

    /// Number of times the provider has been rebuilt.
    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Recognize text, rebuilding the provider and retrying once on failure.
    pub fn recognize(&mut self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        if let Some(provider) = self.provider.as_mut() {
            match guarded(OcrError::Recognition, || provider.recognize(image)) {
                Ok(result) => return Ok(result),
                Err(e) => warn!("OCR provider failed, rebuilding: {}", e),
            }
        }

        // Drop the failed provider before building its replacement.
        self.provider = None;
        let rebuilt = guarded(OcrError::ModelLoad, &self.factory)?;
        let provider = self.provider.insert(rebuilt);
        self.resets += 1;
        info!("OCR provider rebuilt (reset #{})", self.resets);

        guarded(OcrError::Recognition, || provider.recognize(image))
    }
}

/// Run `f`, turning a panic into the error built by `wrap`.
fn guarded<T>(
    wrap: fn(String) -> OcrError,
    f: impl FnOnce() -> Result<T, OcrError>,
) -> Result<T, OcrError> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(wrap(format!("panicked: {}", panic_message(&*payload)))))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Provider that fails a fixed number of calls before succeeding.
    struct FlakyProvider {
        failures_left: usize,
    }

    /// Provider that panics on its first call.
    struct PanickyProvider {
        panicked: bool,
    }

    impl OcrProvider for PanickyProvider {
        fn recognize(&mut self, _image: &DynamicImage) -> Result<OcrResult, OcrError> {
            if !self.panicked {
                self.panicked = true;
                panic!("onnx session aborted");
            }
            Ok(OcrResult::from_lines(["IVA 21.00"]))
        }
    }

    impl OcrProvider for FlakyProvider {
        fn recognize(&mut self, _image: &DynamicImage) -> Result<OcrResult, OcrError> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                Err(OcrError::Recognition("engine crashed".to_string()))
            } else {
                Ok(OcrResult::from_lines(["Total 10.00"]))
            }
        }
    }

    fn image() -> DynamicImage {
        DynamicImage::new_rgb8(4, 4)
    }

    /// Factory handing out providers with the given failure counts in order.
    fn factory(
        plan: Vec<usize>,
        built: Arc<AtomicUsize>,
    ) -> impl Fn() -> Result<FlakyProvider, OcrError> + 'static {
        move || {
            let n = built.fetch_add(1, Ordering::SeqCst);
            match plan.get(n) {
                Some(&failures_left) => Ok(FlakyProvider { failures_left }),
                None => Err(OcrError::ModelLoad("no more providers".to_string())),
            }
        }
    }

    #[test]
    fn test_success_without_reset() {
        let built = Arc::new(AtomicUsize::new(0));
        let mut session = OcrSession::new(factory(vec![0], built.clone())).unwrap();

        let result = session.recognize(&image()).unwrap();
        assert_eq!(result.text, "Total 10.00");
        assert_eq!(session.resets(), 0);
        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_rebuilds_and_retries_once() {
        let built = Arc::new(AtomicUsize::new(0));
        let mut session = OcrSession::new(factory(vec![1, 0], built.clone())).unwrap();

        let result = session.recognize(&image()).unwrap();
        assert_eq!(result.text, "Total 10.00");
        assert_eq!(session.resets(), 1);
        assert_eq!(built.load(Ordering::SeqCst), 2);

        // The rebuilt provider stays in place for later calls.
        session.recognize(&image()).unwrap();
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_second_failure_is_returned() {
        let built = Arc::new(AtomicUsize::new(0));
        let mut session = OcrSession::new(factory(vec![1, 1, 0], built.clone())).unwrap();

        let err = session.recognize(&image()).unwrap_err();
        assert!(matches!(err, OcrError::Recognition(_)));
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_factory_failure_is_returned() {
        let built = Arc::new(AtomicUsize::new(0));
        let mut session = OcrSession::new(factory(vec![1], built.clone())).unwrap();

        let err = session.recognize(&image()).unwrap_err();
        assert!(matches!(err, OcrError::ModelLoad(_)));

        // Without a provider the next call goes straight to the factory.
        assert!(session.recognize(&image()).is_err());
        assert_eq!(built.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_initial_factory_failure() {
        let built = Arc::new(AtomicUsize::new(0));
        assert!(OcrSession::new(factory(Vec::new(), built)).is_err());
    }

    #[test]
    fn test_panic_triggers_rebuild() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = built.clone();
        let mut session = OcrSession::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(PanickyProvider { panicked: false })
        })
        .unwrap();

        // The first provider panics; its replacement also panics on first use.
        let err = session.recognize(&image()).unwrap_err();
        match err {
            OcrError::Recognition(msg) => assert!(msg.contains("onnx session aborted"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(session.resets(), 1);

        // The session stays usable afterwards.
        let result = session.recognize(&image()).unwrap();
        assert_eq!(result.text, "IVA 21.00");
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panic_once_recovers_on_retry() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = built.clone();
        let mut session = OcrSession::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Ok(PanickyProvider { panicked: n > 0 })
        })
        .unwrap();

        let result = session.recognize(&image()).unwrap();
        assert_eq!(result.text, "IVA 21.00");
        assert_eq!(session.resets(), 1);
    }

    #[test]
    fn test_factory_panic_is_model_load_error() {
        let result = OcrSession::<FlakyProvider>::new(|| panic!("missing weights"));
        match result.err().unwrap() {
            OcrError::ModelLoad(msg) => assert!(msg.contains("missing weights"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
