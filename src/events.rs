//! Inbound event queue driving the engine.
//!
//! Frames from the transport layer, sensor edits from the point list and
//! baseline requests from the UI are all posted as [`ThermometryEvent`]s and
//! handled strictly one after another on the engine thread.

use std::sync::mpsc::{Receiver, SendError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use log::{info, warn};

use crate::config::CalibrationParams;
use crate::data::frame::PhaseFrame;
use crate::data::sensors::SensorId;
use crate::engine::ThermometryEngine;
use crate::error::Result;
use crate::sink::DisplaySink;

/// Messages accepted by the engine loop.
#[derive(Debug, Clone)]
pub enum ThermometryEvent {
    /// A new phase volume arrived.
    FrameAvailable(Arc<PhaseFrame>),
    SensorAdded {
        id: SensorId,
        label: String,
        position: [f64; 3],
    },
    SensorMoved {
        id: SensorId,
        position: [f64; 3],
    },
    SensorRelabeled {
        id: SensorId,
        description: String,
    },
    SensorRemoved {
        id: SensorId,
    },
    SetBaseline(CalibrationParams),
    /// Stop the loop after the events queued before it.
    Shutdown,
}

/// Convenience sender for posting events to the engine.
#[derive(Clone)]
pub struct EventSender {
    tx: Sender<ThermometryEvent>,
}

impl EventSender {
    pub fn send(&self, event: ThermometryEvent) -> std::result::Result<(), SendError<ThermometryEvent>> {
        self.tx.send(event)
    }

    pub fn send_frame(&self, frame: Arc<PhaseFrame>) -> std::result::Result<(), SendError<ThermometryEvent>> {
        self.send(ThermometryEvent::FrameAvailable(frame))
    }

    pub fn add_sensor<S: Into<String>>(
        &self,
        id: SensorId,
        label: S,
        position: [f64; 3],
    ) -> std::result::Result<(), SendError<ThermometryEvent>> {
        self.send(ThermometryEvent::SensorAdded {
            id,
            label: label.into(),
            position,
        })
    }

    pub fn move_sensor(&self, id: SensorId, position: [f64; 3]) -> std::result::Result<(), SendError<ThermometryEvent>> {
        self.send(ThermometryEvent::SensorMoved { id, position })
    }

    pub fn relabel_sensor<S: Into<String>>(
        &self,
        id: SensorId,
        description: S,
    ) -> std::result::Result<(), SendError<ThermometryEvent>> {
        self.send(ThermometryEvent::SensorRelabeled {
            id,
            description: description.into(),
        })
    }

    pub fn remove_sensor(&self, id: SensorId) -> std::result::Result<(), SendError<ThermometryEvent>> {
        self.send(ThermometryEvent::SensorRemoved { id })
    }

    pub fn set_baseline(&self, params: CalibrationParams) -> std::result::Result<(), SendError<ThermometryEvent>> {
        self.send(ThermometryEvent::SetBaseline(params))
    }

    pub fn shutdown(&self) -> std::result::Result<(), SendError<ThermometryEvent>> {
        self.send(ThermometryEvent::Shutdown)
    }
}

/// Create a new event channel pair: `(EventSender, Receiver<ThermometryEvent>)`.
pub fn channel_events() -> (EventSender, Receiver<ThermometryEvent>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (EventSender { tx }, rx)
}

impl<S: DisplaySink> ThermometryEngine<S> {
    /// Handle one event to completion. `Shutdown` is a no-op here; the loop
    /// interprets it.
    pub fn handle_event(&mut self, event: ThermometryEvent) -> Result<()> {
        match event {
            ThermometryEvent::FrameAvailable(frame) => self.ingest(frame).map(|_| ()),
            ThermometryEvent::SensorAdded { id, label, position } => {
                self.add_sensor(id, label, position);
                Ok(())
            }
            ThermometryEvent::SensorMoved { id, position } => self.move_sensor(&id, position),
            ThermometryEvent::SensorRelabeled { id, description } => {
                self.relabel_sensor(&id, description)
            }
            ThermometryEvent::SensorRemoved { id } => self.remove_sensor(&id).map(|_| ()),
            ThermometryEvent::SetBaseline(params) => self.set_baseline(params),
            ThermometryEvent::Shutdown => Ok(()),
        }
    }
}

/// Drain `rx` into `engine` until `Shutdown` or until every sender is gone.
///
/// Errors are recoverable by construction and are logged, not propagated.
pub fn run_event_loop<S: DisplaySink>(engine: &mut ThermometryEngine<S>, rx: &Receiver<ThermometryEvent>) {
    while let Ok(event) = rx.recv() {
        if matches!(event, ThermometryEvent::Shutdown) {
            info!("engine loop shutting down");
            return;
        }
        if let Err(err) = engine.handle_event(event) {
            warn!("event failed: {err}");
        }
    }
    info!("event channel closed, engine loop exiting");
}

/// Run the engine on its own thread. The join handle returns the engine
/// once the loop has ended.
pub fn spawn_engine<S>(
    mut engine: ThermometryEngine<S>,
) -> std::io::Result<(EventSender, JoinHandle<ThermometryEngine<S>>)>
where
    S: DisplaySink + Send + 'static,
{
    let (events, rx) = channel_events();
    let handle = std::thread::Builder::new()
        .name("thermometry-engine".into())
        .spawn(move || {
            run_event_loop(&mut engine, &rx);
            engine
        })?;
    Ok((events, handle))
}
