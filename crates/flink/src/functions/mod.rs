//! Per-function-type accessors.
//!
//! One module per subdevice function family. Every accessor is a thin
//! typed view over a [`Subdevice`](crate::Subdevice): construction
//! verifies the function code, and all register addressing goes through
//! the subdevice's shared offset computation, so channel and window
//! bounds are enforced uniformly.

pub mod analog_in;
pub mod analog_out;
pub mod counter;
pub mod dio;
pub mod info;
pub mod ppwa;
pub mod pwm;
pub mod reflective;
pub mod stepper;
pub mod watchdog;

pub use analog_in::AnalogIn;
pub use analog_out::AnalogOut;
pub use counter::Counter;
pub use dio::{Dio, Direction};
pub use info::Info;
pub use ppwa::Ppwa;
pub use pwm::Pwm;
pub use reflective::ReflectiveSensor;
pub use stepper::StepperMotor;
pub use watchdog::Watchdog;
