//! Detail popup sessions.
//!
//! Each opened popup is an explicit [`PopupSession`] holding its sensor, its
//! display window and its chart. Every render request takes a
//! [`RenderTicket`] stamped with the session's generation; a ticket whose
//! generation is no longer current (a newer request was made, or the popup was
//! closed) cannot draw, so a slow fetch never overwrites a newer chart.

use chrono::{DateTime, TimeZone, Utc};
use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::charts::{ChartHandle, ChartSlot, popup_chart};
use crate::error::{AppError, AppResult};
use crate::registry::SensorDescriptor;
use crate::series::{DayFilter, DisplayWindow, Scale, TimeSeries, window_series};

/// Permission to draw one popup render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTicket {
    pub session_id: Uuid,
    pub sensor_id: String,
    pub window: DisplayWindow,
    pub generation: u64,
}

#[derive(Debug)]
pub struct PopupSession {
    id: Uuid,
    sensor: SensorDescriptor,
    window: DisplayWindow,
    generation: u64,
    chart: ChartSlot,
}

impl PopupSession {
    /// Open a popup for `sensor` with the default `{hour, all}` window.
    #[must_use]
    pub fn open(sensor: SensorDescriptor) -> (Self, RenderTicket) {
        let mut session = Self {
            id: Uuid::new_v4(),
            sensor,
            window: DisplayWindow::default(),
            generation: 0,
            chart: ChartSlot::default(),
        };
        let ticket = session.request(None, None);
        (session, ticket)
    }

    /// Change the window (fields left as `None` are kept) and supersede any
    /// outstanding ticket.
    pub fn request(&mut self, scale: Option<Scale>, filter: Option<DayFilter>) -> RenderTicket {
        if let Some(scale) = scale {
            self.window.scale = scale;
        }
        if let Some(filter) = filter {
            self.window.filter = filter;
        }
        self.generation += 1;

        RenderTicket {
            session_id: self.id,
            sensor_id: self.sensor.id.to_string(),
            window: self.window,
            generation: self.generation,
        }
    }

    #[must_use]
    pub fn is_current(&self, ticket: &RenderTicket) -> bool {
        ticket.session_id == self.id && ticket.generation == self.generation
    }

    /// Window `series` for the ticket and replace the popup chart.
    ///
    /// Returns `None` without touching the chart if the ticket was superseded.
    pub fn render<Tz: TimeZone>(
        &mut self,
        ticket: &RenderTicket,
        series: &TimeSeries,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Option<&ChartHandle>
    where
        Tz::Offset: std::fmt::Display,
    {
        if !self.is_current(ticket) {
            tracing::debug!(
                session_id = %self.id,
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                "Dropping superseded popup render"
            );
            return None;
        }

        let windowed = window_series(series, ticket.window, now, tz);
        tracing::debug!(
            sensor_id = self.sensor.id,
            scale = %ticket.window.scale,
            filter = %ticket.window.filter,
            source_points = series.len(),
            plotted_points = windowed.len(),
            "Rendering popup chart"
        );
        Some(
            self.chart
                .replace(popup_chart(&windowed, self.sensor.profile, tz)),
        )
    }

    /// Tear the popup down, releasing its chart. Outstanding tickets stop
    /// being current.
    pub fn close(&mut self) {
        self.generation += 1;
        self.chart.destroy();
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn sensor(&self) -> &SensorDescriptor {
        &self.sensor
    }

    #[must_use]
    pub fn window(&self) -> DisplayWindow {
        self.window
    }

    #[must_use]
    pub fn chart(&self) -> Option<&ChartHandle> {
        self.chart.current()
    }

    #[must_use]
    pub fn view(&self) -> Option<PopupView> {
        let chart = self.chart.current()?.clone();
        Some(PopupView {
            session_id: self.id,
            sensor_id: self.sensor.id.to_string(),
            label: self.sensor.label.to_string(),
            scale: self.window.scale,
            filter: self.window.filter,
            points: chart.config.labels.len(),
            chart,
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PopupView {
    pub session_id: Uuid,
    pub sensor_id: String,
    pub label: String,
    pub scale: Scale,
    pub filter: DayFilter,
    /// Number of plotted points after windowing
    pub points: usize,
    pub chart: ChartHandle,
}

/// Open popup sessions, evicted after a period without use.
#[derive(Clone)]
pub struct PopupSessions {
    sessions: Cache<Uuid, Arc<Mutex<PopupSession>>>,
}

impl PopupSessions {
    #[must_use]
    pub fn new(max_sessions: u64, idle: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle)
            .build();
        Self { sessions }
    }

    pub async fn open(&self, sensor: SensorDescriptor) -> RenderTicket {
        let (session, ticket) = PopupSession::open(sensor);
        tracing::debug!(session_id = %session.id, sensor_id = session.sensor.id, "Popup opened");
        self.sessions
            .insert(session.id, Arc::new(Mutex::new(session)))
            .await;
        ticket
    }

    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the session is unknown or expired.
    pub async fn request(
        &self,
        session_id: Uuid,
        scale: Option<Scale>,
        filter: Option<DayFilter>,
    ) -> AppResult<RenderTicket> {
        let session = self.get(session_id).await?;
        let mut session = session.lock().await;
        Ok(session.request(scale, filter))
    }

    /// Draw the ticket's chart if it is still current.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Superseded` if a newer request was made or the popup
    /// was closed while the series was being fetched.
    pub async fn complete<Tz: TimeZone>(
        &self,
        ticket: &RenderTicket,
        series: &TimeSeries,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> AppResult<PopupView>
    where
        Tz::Offset: std::fmt::Display,
    {
        let superseded = || {
            AppError::Superseded(format!(
                "Popup {} has a newer request",
                ticket.session_id
            ))
        };

        let session = self
            .sessions
            .get(&ticket.session_id)
            .await
            .ok_or_else(superseded)?;
        let mut session = session.lock().await;

        if session.render(ticket, series, now, tz).is_none() {
            return Err(superseded());
        }
        session
            .view()
            .ok_or_else(|| AppError::Internal("Popup chart missing after render".to_string()))
    }

    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the session is unknown or expired.
    pub async fn close(&self, session_id: Uuid) -> AppResult<()> {
        let session = self
            .sessions
            .remove(&session_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Popup '{session_id}' not found")))?;

        // Any render still holding the session sees a bumped generation
        session.lock().await.close();
        tracing::debug!(session_id = %session_id, "Popup closed");
        Ok(())
    }

    async fn get(&self, session_id: Uuid) -> AppResult<Arc<Mutex<PopupSession>>> {
        self.sessions
            .get(&session_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Popup '{session_id}' not found")))
    }
}
