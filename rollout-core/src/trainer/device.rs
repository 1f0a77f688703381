use crate::{Algorithm, Device, Env, ReplayBuffer};
use std::{
    marker::PhantomData,
    ops::{Deref, DerefMut},
};

/// Holds an algorithm on an accelerator for the duration of an update burst.
///
/// The algorithm is moved back to [`Device::Cpu`] when the lease is dropped,
/// including when an update returns an error.
pub(crate) struct DeviceLease<'a, E, R, A>
where
    E: Env,
    R: ReplayBuffer<E>,
    A: Algorithm<E, R>,
{
    algorithm: &'a mut A,
    acquired: bool,
    phantom: PhantomData<(E, R)>,
}

impl<'a, E, R, A> DeviceLease<'a, E, R, A>
where
    E: Env,
    R: ReplayBuffer<E>,
    A: Algorithm<E, R>,
{
    /// Moves `algorithm` to `device`; `None` leaves it where it is.
    pub fn acquire(algorithm: &'a mut A, device: Option<Device>) -> Self {
        if let Some(device) = device {
            algorithm.to_device(device);
        }
        Self {
            algorithm,
            acquired: device.is_some(),
            phantom: PhantomData,
        }
    }
}

impl<'a, E, R, A> Deref for DeviceLease<'a, E, R, A>
where
    E: Env,
    R: ReplayBuffer<E>,
    A: Algorithm<E, R>,
{
    type Target = A;

    fn deref(&self) -> &A {
        self.algorithm
    }
}

impl<'a, E, R, A> DerefMut for DeviceLease<'a, E, R, A>
where
    E: Env,
    R: ReplayBuffer<E>,
    A: Algorithm<E, R>,
{
    fn deref_mut(&mut self) -> &mut A {
        self.algorithm
    }
}

impl<'a, E, R, A> Drop for DeviceLease<'a, E, R, A>
where
    E: Env,
    R: ReplayBuffer<E>,
    A: Algorithm<E, R>,
{
    fn drop(&mut self) {
        if self.acquired {
            self.algorithm.to_device(Device::Cpu);
        }
    }
}
