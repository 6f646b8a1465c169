//! Stateful shell around [`IrrigationModel`].
//!
//! Holds the last sensor snapshot, the running irrigation session and a
//! bounded calculation history. All of it sits behind one lock owned by the
//! service instance; there is no process-wide state.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use heapless::HistoryBuffer;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{Config, ServiceConfig};
use crate::error::{Error, Result};
use crate::irrigation::{IrrigationCategory, IrrigationDecision, IrrigationModel};

pub const HISTORY_CAPACITY: usize = 200;

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReadings {
    pub soil_moisture: f64,
    pub temperature: f64,
    pub humidity: f64,
    /// Seconds since the Unix epoch
    pub updated_at: u64,
}

/// Readings for one calculation; absent fields fall back to the configured defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculateRequest {
    pub soil_moisture: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: u64,
    pub soil_moisture: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub duration_minutes: f64,
    pub category: IrrigationCategory,
}

/// Fixed-capacity calculation log. Once full, each new record evicts the oldest.
pub struct History(HistoryBuffer<HistoryRecord, HISTORY_CAPACITY>);

impl History {
    pub fn new() -> Self {
        Self(HistoryBuffer::new())
    }

    pub fn push(&mut self, record: HistoryRecord) {
        self.0.write(record);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.len() == 0
    }

    /// Oldest record first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.0.oldest_ordered()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub is_active: bool,
    pub remaining_minutes: f64,
}

/// Countdown for a running irrigation.
#[derive(Debug, Default)]
pub struct IrrigationSession {
    ends_at: Option<Instant>,
}

impl IrrigationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) a countdown of `minutes` from `now`.
    pub fn start(&mut self, minutes: f64, now: Instant) -> Result<()> {
        if !minutes.is_finite() || minutes <= 0. {
            return Err(Error::InvalidDuration(minutes));
        }

        let length =
            std::time::Duration::try_from_secs_f64(minutes * 60.).map_err(|_| Error::InvalidDuration(minutes))?;
        let ends_at = now.checked_add(length).ok_or(Error::InvalidDuration(minutes))?;

        self.ends_at = Some(ends_at);

        Ok(())
    }

    pub fn stop(&mut self) {
        self.ends_at = None;
    }

    /// Reports the countdown, ending the session once it has run out.
    pub fn status(&mut self, now: Instant) -> SessionStatus {
        match self.ends_at {
            Some(ends_at) if now < ends_at => SessionStatus {
                is_active: true,
                remaining_minutes: (ends_at - now).as_secs_f64() / 60.,
            },
            _ => {
                self.ends_at = None;

                SessionStatus {
                    is_active: false,
                    remaining_minutes: 0.,
                }
            },
        }
    }
}

struct ServiceState {
    readings: SensorReadings,
    session: IrrigationSession,
    history: History,
}

pub struct IrrigationService {
    model: IrrigationModel,
    config: ServiceConfig,
    state: Mutex<ServiceState>,
}

impl IrrigationService {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let model = IrrigationModel::with_config(&config.engine)?;
        let service = &config.service;
        let readings = SensorReadings {
            soil_moisture: service.initial_soil_moisture,
            temperature: service.initial_temperature,
            humidity: service.initial_humidity,
            updated_at: unix_secs(),
        };

        Ok(Self {
            model,
            config: service.clone(),
            state: Mutex::new(ServiceState {
                readings,
                session: IrrigationSession::new(),
                history: History::new(),
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, ServiceState> {
        // Every critical section leaves the state consistent, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn model(&self) -> &IrrigationModel {
        &self.model
    }

    pub fn readings(&self) -> SensorReadings {
        self.state().readings
    }

    /// Computes a decision, records the readings as the new sensor snapshot and logs it to history.
    pub fn calculate(&self, request: CalculateRequest) -> Result<IrrigationDecision> {
        let soil_moisture = request.soil_moisture.unwrap_or(self.config.default_soil_moisture);
        let temperature = request.temperature.unwrap_or(self.config.default_temperature);
        let humidity = request.humidity.unwrap_or(self.config.default_humidity);

        let decision = self.model.compute(soil_moisture, temperature, humidity)?;
        let timestamp = unix_secs();

        info!(
            "soil {soil_moisture} temp {temperature} humidity {humidity} -> {:.2} min, {}",
            decision.duration_minutes, decision.category
        );

        let mut state = self.state();

        state.readings = SensorReadings {
            soil_moisture,
            temperature,
            humidity,
            updated_at: timestamp,
        };
        state.history.push(HistoryRecord {
            timestamp,
            soil_moisture,
            temperature,
            humidity,
            duration_minutes: decision.duration_minutes,
            category: decision.category,
        });

        Ok(decision)
    }

    pub fn start_irrigation(&self, minutes: f64) -> Result<()> {
        let result = self.state().session.start(minutes, Instant::now());

        match &result {
            Ok(()) => info!("irrigation started for {minutes} min"),
            Err(e) => warn!("irrigation not started: {e}"),
        }

        result
    }

    pub fn stop_irrigation(&self) {
        self.state().session.stop();
        info!("irrigation stopped");
    }

    pub fn irrigation_status(&self) -> SessionStatus {
        self.state().session.status(Instant::now())
    }

    /// Oldest record first.
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.state().history.iter().copied().collect()
    }
}
