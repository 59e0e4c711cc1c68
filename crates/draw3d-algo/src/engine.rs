//! Runs loaded algorithms against a scene.
//!
//! Every task gets its own worker. Workers only compute; everything they
//! produce is sent over one queue to the engine, which is the only place the
//! scene and the drone slots are mutated. A task's dispatches arrive in the
//! order it sent them.

use crate::algorithm::Algorithm;
use crate::drone::{DroneSlots, DroneState};
use crate::error::SchedulerError;
use crate::registry::AlgorithmRegistry;
use chrono::{DateTime, Utc};
use draw3d_core::{Geometry, Material, Primitive, Scene};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

const DISPATCH_QUEUE: usize = 64;

/// Navigation and control requests, applied in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StepForward,
    StepBackward,
    JumpToStart(usize),
    /// Cancels running tasks and returns to a single empty view.
    ResetAll,
    ToggleManualCumulate,
    ReloadCurrent,
    /// Shifts the live origin by whole nudge steps.
    NudgeOrigin { x: i8, y: i8 },
    ClearAndAdvance,
    LoadAlgorithm(String),
    RunAlgorithms,
}

enum Dispatch {
    Emit {
        task: usize,
        iteration: usize,
        primitives: Vec<Primitive>,
        material: Option<Material>,
        clear: bool,
    },
    PeekPartner {
        task: usize,
        iteration: usize,
        reply: oneshot::Sender<Option<DroneState>>,
    },
}

struct Loaded {
    name: String,
    algorithm: Box<dyn Algorithm>,
    target: usize,
    drone: Option<u8>,
}

struct Running {
    name: String,
    target: usize,
    drone: Option<u8>,
    cancel: watch::Sender<bool>,
    drawn: usize,
    dropped: usize,
}

impl Running {
    fn canceled(&self) -> bool {
        *self.cancel.borrow()
    }
}

struct Outcome {
    task: usize,
    iterations: usize,
    canceled: bool,
}

#[derive(Debug, Clone)]
pub struct TaskReport {
    pub name: String,
    pub target: usize,
    /// Iterations the worker handed off.
    pub iterations: usize,
    /// Iterations drawn into the scene.
    pub drawn: usize,
    /// Iterations discarded because the task was canceled in flight.
    pub dropped: usize,
    pub canceled: bool,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    pub tasks: Vec<TaskReport>,
}

impl RunReport {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished - self.started
    }
}

pub struct Engine {
    scene: Scene,
    registry: AlgorithmRegistry,
    loaded: Vec<Loaded>,
    slots: DroneSlots,
    speedup: f64,
    command_tx: mpsc::UnboundedSender<Command>,
    commands: mpsc::UnboundedReceiver<Command>,
}

impl Engine {
    pub fn new(scene: Scene, registry: AlgorithmRegistry) -> Self {
        let (command_tx, commands) = mpsc::unbounded_channel();
        Self {
            scene,
            registry,
            loaded: Vec::new(),
            slots: DroneSlots::default(),
            speedup: 1.0,
            command_tx,
            commands,
        }
    }

    /// Divides every algorithm's delay by `factor`.
    pub fn with_speedup(mut self, factor: f64) -> Self {
        if factor.is_finite() && factor > 0.0 {
            self.speedup = factor;
        }
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    pub fn drone_slots(&self) -> &DroneSlots {
        &self.slots
    }

    pub fn loaded_names(&self) -> Vec<&str> {
        self.loaded.iter().map(|l| l.name.as_str()).collect()
    }

    /// Queue for commands issued while algorithms run.
    pub fn commands(&self) -> mpsc::UnboundedSender<Command> {
        self.command_tx.clone()
    }

    pub fn load(&mut self, name: &str) -> Result<usize, SchedulerError> {
        let algorithm = self
            .registry
            .instantiate(name)
            .inspect_err(|err| warn!("{err}"))?;
        self.load_algorithm(name, algorithm)
    }

    /// Registers a task. Drones get an id and an overlay view of their own;
    /// other algorithms draw into the building view. Returns the target view.
    pub fn load_algorithm(
        &mut self,
        name: &str,
        mut algorithm: Box<dyn Algorithm>,
    ) -> Result<usize, SchedulerError> {
        let drones = self.loaded.iter().filter(|l| l.drone.is_some()).count();
        let mixed = if algorithm.is_drone() {
            drones < self.loaded.len()
        } else {
            drones > 0
        };
        if mixed {
            let err = SchedulerError::DroneMix {
                name: name.to_string(),
            };
            warn!("{err}");
            return Err(err);
        }
        let (target, drone) = if algorithm.is_drone() {
            if drones >= DroneSlots::CAPACITY {
                let err = SchedulerError::DronePairingOverflow {
                    name: name.to_string(),
                };
                warn!("{err}");
                return Err(err);
            }
            let id = drones as u8;
            algorithm.set_id(id);
            (self.scene.open_overlay_view(), Some(id))
        } else {
            (self.scene.building_index(), None)
        };
        info!(name, target, drone = ?drone, "loaded algorithm");
        self.loaded.push(Loaded {
            name: name.to_string(),
            algorithm,
            target,
            drone,
        });
        Ok(target)
    }

    pub async fn apply(&mut self, command: Command) -> Result<Option<RunReport>, SchedulerError> {
        match command {
            Command::LoadAlgorithm(name) => {
                self.load(&name)?;
                Ok(None)
            }
            Command::RunAlgorithms => self.run().await.map(Some),
            other => {
                self.apply_now(other)?;
                Ok(None)
            }
        }
    }

    fn apply_now(&mut self, command: Command) -> Result<(), SchedulerError> {
        debug!(?command, "apply");
        match command {
            Command::StepForward => {
                self.scene.step_forward()?;
            }
            Command::StepBackward => {
                self.scene.step_backward()?;
            }
            Command::JumpToStart(index) => self.scene.jump_to_start(index)?,
            Command::ResetAll => {
                self.scene.reset_all();
                self.loaded.clear();
                self.slots.clear();
            }
            Command::ToggleManualCumulate => {
                let on = self.scene.toggle_manual_cumulate();
                info!(on, "manual cumulate");
            }
            Command::ReloadCurrent => self.scene.reload_current(),
            Command::NudgeOrigin { x, y } => self.scene.nudge_origin(x, y),
            Command::ClearAndAdvance => {
                self.scene.clear_and_advance()?;
            }
            Command::LoadAlgorithm(_) | Command::RunAlgorithms => return Err(SchedulerError::Busy),
        }
        Ok(())
    }

    fn apply_live(&mut self, running: &[Running], command: Command) -> Result<(), SchedulerError> {
        if command == Command::ResetAll {
            for task in running {
                task.cancel.send_replace(true);
            }
            info!("canceled running algorithms");
        }
        self.apply_now(command)
    }

    fn scaled(&self, delay: Duration) -> Duration {
        delay.div_f64(self.speedup)
    }

    /// Runs every loaded task to completion or cancellation. Commands sent
    /// through [`Engine::commands`] are applied between dispatches.
    pub async fn run(&mut self) -> Result<RunReport, SchedulerError> {
        if self.loaded.is_empty() {
            return Err(SchedulerError::NothingLoaded);
        }
        let started = Utc::now();
        let loaded = std::mem::take(&mut self.loaded);
        let paired = loaded.iter().filter(|l| l.drone.is_some()).count() == DroneSlots::CAPACITY;

        let (tx, mut rx) = mpsc::channel(DISPATCH_QUEUE);
        let mut workers = JoinSet::new();
        let mut running = Vec::with_capacity(loaded.len());
        for (task, entry) in loaded.into_iter().enumerate() {
            let (cancel, cancel_rx) = watch::channel(false);
            let pause = self.scaled(entry.algorithm.delay());
            info!(
                task,
                name = %entry.name,
                target = entry.target,
                iterations = entry.algorithm.iteration_count(),
                "starting algorithm"
            );
            workers.spawn(drive(
                task,
                entry.algorithm,
                paired && entry.drone.is_some(),
                pause,
                cancel_rx,
                tx.clone(),
            ));
            running.push(Running {
                name: entry.name,
                target: entry.target,
                drone: entry.drone,
                cancel,
                drawn: 0,
                dropped: 0,
            });
        }
        drop(tx);

        let (_, idle) = mpsc::unbounded_channel();
        let mut commands = std::mem::replace(&mut self.commands, idle);
        let mut outcomes = Vec::new();
        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(msg) => self.dispatch(&mut running, msg),
                    None => break,
                },
                Some(joined) = workers.join_next() => outcomes.push(joined),
                Some(command) = commands.recv() => {
                    if let Err(err) = self.apply_live(&running, command) {
                        warn!("{err}");
                    }
                }
            }
        }
        while let Some(joined) = workers.join_next().await {
            outcomes.push(joined);
        }
        self.commands = commands;

        let mut finished: HashMap<usize, Outcome> = HashMap::new();
        for joined in outcomes {
            match joined {
                Ok(outcome) => {
                    finished.insert(outcome.task, outcome);
                }
                Err(err) => warn!("algorithm worker failed: {err}"),
            }
        }
        let tasks = running
            .into_iter()
            .enumerate()
            .map(|(task, run)| {
                let outcome = finished.get(&task);
                TaskReport {
                    canceled: outcome.map_or(true, |o| o.canceled),
                    iterations: outcome.map_or(0, |o| o.iterations),
                    name: run.name,
                    target: run.target,
                    drawn: run.drawn,
                    dropped: run.dropped,
                }
            })
            .collect::<Vec<_>>();

        self.slots.clear();
        let report = RunReport {
            started,
            finished: Utc::now(),
            tasks,
        };
        info!(
            tasks = report.tasks.len(),
            elapsed_ms = report.elapsed().num_milliseconds(),
            "algorithms finished"
        );
        Ok(report)
    }

    fn dispatch(&mut self, running: &mut [Running], msg: Dispatch) {
        match msg {
            Dispatch::PeekPartner {
                task,
                iteration,
                reply,
            } => {
                let state = running
                    .get(task)
                    .filter(|run| !run.canceled())
                    .and_then(|run| run.drone)
                    .and_then(|id| self.slots.latest_before(DroneSlots::partner(id), iteration));
                let _ = reply.send(state);
            }
            Dispatch::Emit {
                task,
                iteration,
                primitives,
                material,
                clear,
            } => {
                let Some(run) = running.get_mut(task) else {
                    return;
                };
                if run.canceled() {
                    run.dropped += 1;
                    debug!(task, iteration, "dropped dispatch of canceled task");
                    return;
                }
                if clear {
                    self.scene.clear_rendered(run.target);
                }
                if let Some(material) = material {
                    self.scene.defaults_mut().material = material;
                }
                for mut primitive in primitives {
                    let published = match (&mut primitive.geometry, run.drone) {
                        (Geometry::Drone(drone), Some(id)) => {
                            drone.id = id;
                            Some(DroneState {
                                id,
                                iteration,
                                position: drone.at,
                            })
                        }
                        _ => None,
                    };
                    if let Err(err) = self.scene.draw_to_view(run.target, primitive) {
                        warn!(task = %run.name, "{err}");
                    }
                    if let Some(state) = published {
                        self.slots.publish(state);
                    }
                }
                run.drawn += 1;
            }
        }
    }
}

async fn drive(
    task: usize,
    mut algorithm: Box<dyn Algorithm>,
    paired: bool,
    pause: Duration,
    mut cancel: watch::Receiver<bool>,
    tx: mpsc::Sender<Dispatch>,
) -> Outcome {
    let clear = algorithm.clear_before_each_iteration();
    let mut iterations = 0;
    for iteration in 0..algorithm.iteration_count() {
        if *cancel.borrow() {
            break;
        }
        if paired {
            let (reply, answer) = oneshot::channel();
            let peek = Dispatch::PeekPartner {
                task,
                iteration,
                reply,
            };
            if tx.send(peek).await.is_err() {
                break;
            }
            if let Ok(Some(state)) = answer.await {
                algorithm.set_info(state);
            }
        }
        let primitives = algorithm.process(iteration).into_primitives();
        let material = algorithm.material_for(iteration);
        if *cancel.borrow() {
            break;
        }
        let emit = Dispatch::Emit {
            task,
            iteration,
            primitives,
            material,
            clear,
        };
        if tx.send(emit).await.is_err() {
            break;
        }
        iterations += 1;
        tokio::select! {
            _ = tokio::time::sleep(pause) => {}
            _ = cancel.changed() => {}
        }
    }
    let canceled = *cancel.borrow();
    Outcome {
        task,
        iterations,
        canceled,
    }
}
