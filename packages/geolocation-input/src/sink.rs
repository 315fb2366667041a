use std::rc::Rc;

use crate::{LocationResult, SinkError};

/// An application input channel that takes one value per call, addressed by name.
pub trait InputSink {
    fn send(&self, name: &str, value: &LocationResult) -> Result<(), SinkError>;
}

impl<S: InputSink + ?Sized> InputSink for &S {
    fn send(&self, name: &str, value: &LocationResult) -> Result<(), SinkError> {
        (**self).send(name, value)
    }
}

impl<S: InputSink + ?Sized> InputSink for Rc<S> {
    fn send(&self, name: &str, value: &LocationResult) -> Result<(), SinkError> {
        (**self).send(name, value)
    }
}
