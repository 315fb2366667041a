use futures_channel::oneshot;

use crate::{Coordinates, PositionError, PositionOptions};

/// What a provider answers a fix request with.
pub type FixOutcome = Result<Coordinates, PositionError>;

/// Something that can asynchronously produce a coordinate fix or an error.
///
/// Implementations must answer through the [`FixResolver`] they are given. They may do so
/// before `get_fix` returns or at any later point on the same event loop.
pub trait LocationProvider {
    fn get_fix(&self, options: &PositionOptions, resolver: FixResolver);
}

impl<P: LocationProvider + ?Sized> LocationProvider for &P {
    fn get_fix(&self, options: &PositionOptions, resolver: FixResolver) {
        (**self).get_fix(options, resolver)
    }
}

impl<P: LocationProvider + ?Sized> LocationProvider for std::rc::Rc<P> {
    fn get_fix(&self, options: &PositionOptions, resolver: FixResolver) {
        (**self).get_fix(options, resolver)
    }
}

/// The single-shot answer handle for one fix request.
///
/// Both [`succeed`](Self::succeed) and [`fail`](Self::fail) consume the resolver, so a request
/// is answered at most once. Dropping it unanswered abandons the request.
#[derive(Debug)]
pub struct FixResolver {
    sender: oneshot::Sender<FixOutcome>,
}

impl FixResolver {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<FixOutcome>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    /// Answer the request with a fix.
    pub fn succeed(self, coordinates: Coordinates) {
        self.resolve(Ok(coordinates))
    }

    /// Answer the request with a provider failure.
    pub fn fail(self, error: PositionError) {
        self.resolve(Err(error))
    }

    pub fn resolve(self, outcome: FixOutcome) {
        // the receiver is only gone if the request future itself was dropped
        if self.sender.send(outcome).is_err() {
            tracing::trace!("fix resolved after its request was dropped");
        }
    }
}

/// Whether the platform offers a location provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability<P> {
    Available(P),
    Unavailable,
}

impl<P> Capability<P> {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl<P> From<Option<P>> for Capability<P> {
    fn from(provider: Option<P>) -> Self {
        match provider {
            Some(provider) => Self::Available(provider),
            None => Self::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn resolver_delivers_once() {
        let (resolver, receiver) = FixResolver::channel();
        resolver.succeed(Coordinates::new(1.0, 2.0));
        assert_eq!(block_on(receiver).unwrap(), Ok(Coordinates::new(1.0, 2.0)));
    }

    #[test]
    fn dropped_resolver_cancels() {
        let (resolver, receiver) = FixResolver::channel();
        drop(resolver);
        assert!(block_on(receiver).is_err());
    }

    #[test]
    fn resolving_without_receiver_is_quiet() {
        let (resolver, receiver) = FixResolver::channel();
        drop(receiver);
        resolver.fail(PositionError::new(3, "Timeout expired"));
    }

    #[test]
    fn capability_from_option() {
        assert!(Capability::from(Some(())).is_available());
        assert_eq!(Capability::<()>::from(None), Capability::Unavailable);
    }
}
