//! Route lifecycle coordination for one selected hospital at a time.
//!
//! The coordinator exclusively owns the displayed route set. Resolutions run
//! as spawned tasks and report back over a channel; merging only ever happens
//! on the coordinator's side of that channel, one completion at a time.
//!
//! Each selection starts a new cycle. Completions are tagged with the
//! [`CycleToken`] current at dispatch and dropped on merge if the token no
//! longer admits them. The viewport is fitted once per cycle, on the first
//! merged result, and once more after each new supplier target.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::criticality::{CriticalityAssessment, CriticalityDetector};
use crate::haversine::Coordinate;
use crate::hospital::HospitalDirectory;
use crate::resolver::RouteResolver;
use crate::route::{RouteKey, RouteKind, RouteRequest, RouteResult, RouteSummary};
use crate::selector::{CandidateSelector, TransferPlan};
use crate::traits::{MapSurface, RouteStyle, RoutingService};
use crate::viewport::ViewportAdjuster;

/// Identifies which selection cycle, and which clear of each route lane,
/// a dispatched request belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CycleToken {
    pub cycle: u64,
    pub transfer_epoch: u64,
    pub supplier_epoch: u64,
}

impl CycleToken {
    /// Whether a completion issued under `issued` may merge into the current state.
    pub fn admits(&self, issued: &CycleToken, kind: RouteKind) -> bool {
        self.cycle == issued.cycle
            && match kind {
                RouteKind::Transfer => self.transfer_epoch == issued.transfer_epoch,
                RouteKind::Supplier => self.supplier_epoch == issued.supplier_epoch,
            }
    }
}

/// A finished resolution waiting to be merged.
#[derive(Debug, Clone)]
pub struct Completion {
    pub token: CycleToken,
    pub result: RouteResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged { viewport_fitted: bool },
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Resolving,
    Settled,
}

/// Routes currently on the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveRouteSet {
    pub transfers: BTreeMap<RouteKey, RouteResult>,
    pub supplier: Option<RouteResult>,
    pub viewport_adjusted: bool,
}

impl ActiveRouteSet {
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty() && self.supplier.is_none()
    }

    pub fn routes(&self) -> impl Iterator<Item = &RouteResult> {
        self.transfers.values().chain(self.supplier.iter())
    }
}

/// External vendor location for the supplier route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierTarget {
    pub name: String,
    pub location: Coordinate,
}

/// Analysis of the hospital selected in the current cycle.
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub hospital_id: String,
    pub hospital_name: String,
    pub location: Coordinate,
    pub assessment: CriticalityAssessment,
    pub recommendations: Vec<TransferPlan>,
}

type SupplierListener = Box<dyn FnMut(&RouteSummary) + Send>;

/// Owns the routes shown for the selected hospital and the supplier target.
///
/// `S` answers route requests, `M` displays them. All mutation goes through
/// `&mut self`; resolutions run on the tokio runtime and only take effect once
/// merged by [`apply`](Self::apply) or one of the pumping methods.
pub struct RouteLifecycleCoordinator<S, M> {
    resolver: Arc<RouteResolver<S>>,
    map: M,
    detector: CriticalityDetector,
    selector: CandidateSelector,
    viewport: ViewportAdjuster,
    token: CycleToken,
    phase: Phase,
    selection: Option<Selection>,
    supplier_target: Option<SupplierTarget>,
    routes: ActiveRouteSet,
    in_flight: HashSet<RouteKey>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    snapshots: watch::Sender<ActiveRouteSet>,
    on_supplier_route: Option<SupplierListener>,
}

impl<S, M> RouteLifecycleCoordinator<S, M>
where
    S: RoutingService + 'static,
    M: MapSurface,
{
    /// Creates an idle coordinator.
    ///
    /// The configuration is validated first, so a hand-built config with a
    /// zero speed or timeout is rejected here rather than producing infinite
    /// estimates later.
    pub fn new(service: S, map: M, config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (snapshots, _) = watch::channel(ActiveRouteSet::default());
        Ok(Self {
            resolver: Arc::new(RouteResolver::new(service, &config.routing)),
            map,
            detector: CriticalityDetector::new(config.thresholds.clone()),
            selector: CandidateSelector::new(&config.thresholds),
            viewport: ViewportAdjuster::new(config.viewport.clone()),
            token: CycleToken::default(),
            phase: Phase::Idle,
            selection: None,
            supplier_target: None,
            routes: ActiveRouteSet::default(),
            in_flight: HashSet::new(),
            completions_tx,
            completions_rx,
            snapshots,
            on_supplier_route: None,
        })
    }

    /// Called with the summary of every merged supplier route.
    pub fn on_supplier_route<F>(&mut self, listener: F)
    where
        F: FnMut(&RouteSummary) + Send + 'static,
    {
        self.on_supplier_route = Some(Box::new(listener));
    }

    /// Receives a snapshot of the route set after every change.
    pub fn subscribe(&self) -> watch::Receiver<ActiveRouteSet> {
        self.snapshots.subscribe()
    }

    /// Routes merged so far in the current cycle.
    pub fn routes(&self) -> &ActiveRouteSet {
        &self.routes
    }

    /// Analysis of the selected hospital, `None` while idle.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Whether requests of the current cycle are still outstanding.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn token(&self) -> CycleToken {
        self.token
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// True while an admitted request has not been merged yet.
    pub fn has_pending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Starts a cycle for `hospital_id` and dispatches its routes.
    ///
    /// Must be called from within a tokio runtime. An id missing from the
    /// directory leaves the coordinator idle.
    pub fn select_hospital<D>(&mut self, hospital_id: &str, directory: &D) -> CycleToken
    where
        D: HospitalDirectory + ?Sized,
    {
        self.start_cycle();

        let hospitals = directory.snapshot();
        let Some(hospital) = hospitals.iter().find(|h| h.id == hospital_id) else {
            warn!(hospital_id, "selected hospital not in directory");
            self.publish();
            return self.token;
        };

        let assessment = self.detector.assess(hospital);
        let recommendations =
            self.selector
                .plan_transfers(hospital, &assessment.critical_types, &hospitals);

        let requests: Vec<RouteRequest> = recommendations
            .iter()
            .map(|plan| {
                RouteRequest::new(
                    RouteKey::transfer(plan.equipment, plan.supplier_id.clone()),
                    plan.supplier_location,
                    hospital.location,
                )
            })
            .collect();

        self.selection = Some(Selection {
            hospital_id: hospital.id.clone(),
            hospital_name: hospital.name.clone(),
            location: hospital.location,
            assessment,
            recommendations,
        });

        for request in requests {
            self.dispatch(request);
        }
        if let Some(target) = self.supplier_target.as_ref().map(|target| target.location) {
            self.dispatch(RouteRequest::new(RouteKey::Supplier, hospital.location, target));
        }

        debug!(
            cycle = self.token.cycle,
            hospital_id,
            dispatched = self.in_flight.len(),
            "selection cycle started"
        );
        self.phase = if self.in_flight.is_empty() {
            Phase::Settled
        } else {
            Phase::Resolving
        };
        self.publish();
        self.token
    }

    /// Ends the current cycle and clears the map.
    pub fn deselect(&mut self) -> CycleToken {
        self.start_cycle();
        self.publish();
        self.token
    }

    /// Sets or clears the external supplier location.
    ///
    /// Only the supplier lane is invalidated; transfer routes stay on the
    /// map. A new target reopens the viewport gate so the next merged route
    /// is fitted once more.
    pub fn set_supplier_target(&mut self, target: Option<SupplierTarget>) {
        self.clear_supplier_route();
        self.supplier_target = target;

        let source = self.selection.as_ref().map(|selection| selection.location);
        let target = self.supplier_target.as_ref().map(|target| target.location);
        if let (Some(source), Some(target)) = (source, target) {
            self.routes.viewport_adjusted = false;
            self.dispatch(RouteRequest::new(RouteKey::Supplier, source, target));
            self.refresh_phase();
            self.publish();
        }
    }

    /// Removes the supplier route and drops any supplier result still in flight.
    pub fn clear_supplier_route(&mut self) {
        self.token.supplier_epoch += 1;
        self.in_flight.remove(&RouteKey::Supplier);
        if self.routes.supplier.take().is_some() {
            self.map.remove_route(&RouteKey::Supplier.overlay_id());
        }
        self.refresh_phase();
        self.publish();
    }

    /// Removes every transfer route and drops transfer results still in flight.
    pub fn clear_transfer_routes(&mut self) {
        self.token.transfer_epoch += 1;
        self.in_flight.retain(|key| key.kind() != RouteKind::Transfer);
        for key in std::mem::take(&mut self.routes.transfers).into_keys() {
            self.map.remove_route(&key.overlay_id());
        }
        self.refresh_phase();
        self.publish();
    }

    /// Merges one completion into the route set.
    pub fn apply(&mut self, completion: Completion) -> MergeOutcome {
        let Completion { token, result } = completion;
        let kind = result.key.kind();
        if !self.token.admits(&token, kind) {
            debug!(issued = ?token, current = ?self.token, key = ?result.key, "discarding stale route");
            return MergeOutcome::Stale;
        }

        self.in_flight.remove(&result.key);
        let style = match kind {
            RouteKind::Transfer => RouteStyle::Transfer,
            RouteKind::Supplier => RouteStyle::Supplier,
        };
        self.map
            .draw_route(&result.key.overlay_id(), result.geometry.points(), style);

        match kind {
            RouteKind::Transfer => {
                self.routes.transfers.insert(result.key.clone(), result);
            }
            RouteKind::Supplier => {
                let summary = result.summary();
                self.routes.supplier = Some(result);
                if let Some(listener) = self.on_supplier_route.as_mut() {
                    debug!(?summary, "notifying supplier route listener");
                    listener(&summary);
                }
            }
        }

        let viewport_fitted = self.fit_viewport_once();
        self.refresh_phase();
        self.publish();
        MergeOutcome::Merged { viewport_fitted }
    }

    /// Waits for the next completion and merges it.
    pub async fn next_completion(&mut self) -> Option<MergeOutcome> {
        let completion = self.completions_rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Merges every completion that has already arrived, without waiting.
    pub fn drain_ready(&mut self) -> Vec<MergeOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.completions_rx.try_recv() {
            outcomes.push(self.apply(completion));
        }
        outcomes
    }

    /// Waits until every request of the current cycle has been merged.
    pub async fn settle(&mut self) {
        while self.has_pending() {
            if self.next_completion().await.is_none() {
                break;
            }
        }
    }

    fn start_cycle(&mut self) {
        for route in self.routes.routes() {
            self.map.remove_route(&route.key.overlay_id());
        }
        self.token = CycleToken {
            cycle: self.token.cycle + 1,
            ..CycleToken::default()
        };
        self.routes = ActiveRouteSet::default();
        self.in_flight.clear();
        self.selection = None;
        self.phase = Phase::Idle;
    }

    fn dispatch(&mut self, request: RouteRequest) {
        let token = self.token;
        let resolver = Arc::clone(&self.resolver);
        let tx = self.completions_tx.clone();
        self.in_flight.insert(request.key.clone());

        tokio::spawn(async move {
            let fallback = request.clone();
            let worker = Arc::clone(&resolver);
            let result = match tokio::spawn(async move { worker.resolve(request).await }).await {
                Ok(result) => result,
                Err(err) => {
                    warn!(key = ?fallback.key, error = %err, "route resolution aborted, estimating route");
                    resolver.estimate(fallback)
                }
            };
            // The receiver lives as long as the coordinator; nothing to do if it is gone.
            let _ = tx.send(Completion { token, result });
        });
    }

    fn fit_viewport_once(&mut self) -> bool {
        if self.routes.viewport_adjusted {
            return false;
        }
        let anchor = self.selection.as_ref().map(|selection| selection.location);
        let points: Vec<Coordinate> = self
            .routes
            .routes()
            .flat_map(|route| {
                route
                    .geometry
                    .points()
                    .iter()
                    .copied()
                    .chain([route.source, route.target])
            })
            .chain(anchor)
            .collect();

        let fitted = self.viewport.fit(&points, &mut self.map).is_some();
        self.routes.viewport_adjusted = fitted;
        fitted
    }

    fn refresh_phase(&mut self) {
        if self.selection.is_none() {
            self.phase = Phase::Idle;
        } else if self.in_flight.is_empty() {
            self.phase = Phase::Settled;
        } else {
            self.phase = Phase::Resolving;
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.routes.clone());
    }
}
