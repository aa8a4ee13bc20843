use log::*;
use serde::*;
use squadron::input::*;
use squadron::military::action::SquadAction;
use squadron::position::Position;
use squadron::sim::Sandbox;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Deserialize)]
pub struct AgentSpawn {
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub speed: Option<f32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum EventKind {
    Key { key: char, cursor: Position },
    Kill { kill: String },
}

#[derive(Deserialize)]
pub struct ScenarioEvent {
    pub tick: u32,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
pub enum ScenarioAction {
    Regroup,
    HoldPosition,
    MoveTo { x: f32, y: f32 },
    Attack { target: String },
    Disband,
}

#[derive(Deserialize)]
pub struct ScheduledActionEvent {
    pub tick: u32,
    pub action: ScenarioAction,
    #[serde(default)]
    pub interval_seconds: Option<f64>,
    /// Queue as the follow-up instead of replacing the current action.
    #[serde(default)]
    pub queue: bool,
}

#[derive(Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub description: String,
    pub agents: Vec<AgentSpawn>,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
    #[serde(default)]
    pub actions: Vec<ScheduledActionEvent>,
}

pub fn load_scenario<P>(path: P) -> Result<Scenario, String>
where
    P: AsRef<Path>,
{
    let mut file = File::open(path).map_err(|err| format!("Failed to open scenario file: {}", err))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|err| format!("Failed to read scenario file: {}", err))?;

    serde_json::from_str(&contents).map_err(|err| format!("Failed to parse scenario: {}", err))
}

/// Key presses due on a given tick, fed to the sandbox as an input source.
pub struct ScriptedInput {
    pending: Vec<InputEvent>,
}

impl ScriptedInput {
    pub fn for_tick(scenario: &Scenario, tick: u32) -> ScriptedInput {
        let pending = scenario
            .events
            .iter()
            .filter(|event| event.tick == tick)
            .filter_map(|event| match &event.kind {
                EventKind::Key { key, cursor } => match SquadCommand::from_key(*key) {
                    Some(command) => Some(InputEvent { command, cursor: *cursor }),
                    None => {
                        warn!("Ignoring unbound key '{}' at tick {}", key, tick);
                        None
                    }
                },
                EventKind::Kill { .. } => None,
            })
            .collect();

        ScriptedInput { pending }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending)
    }
}

impl Scenario {
    pub fn spawn_agents(&self, sandbox: &mut Sandbox) {
        for agent in &self.agents {
            let position = Position::new(agent.x, agent.y);

            match agent.speed {
                Some(speed) => sandbox.spawn_agent_with_speed(&agent.name, position, speed),
                None => sandbox.spawn_agent(&agent.name, position),
            };
        }
    }

    /// Apply every event scheduled for `tick`: deaths, key presses, then
    /// squad actions.
    pub fn apply_tick(&self, sandbox: &mut Sandbox, tick: u32) -> Result<(), String> {
        for event in self.events.iter().filter(|event| event.tick == tick) {
            if let EventKind::Kill { kill } = &event.kind {
                let agent = sandbox
                    .agent_named(kill)
                    .ok_or_else(|| format!("Unknown agent '{}' at tick {}", kill, tick))?;

                sandbox.kill(agent);
            }
        }

        sandbox.poll_input(&mut ScriptedInput::for_tick(self, tick));

        for scheduled in self.actions.iter().filter(|action| action.tick == tick) {
            self.schedule(sandbox, scheduled)?;
        }

        Ok(())
    }

    fn schedule(&self, sandbox: &mut Sandbox, scheduled: &ScheduledActionEvent) -> Result<(), String> {
        let action = match &scheduled.action {
            ScenarioAction::Regroup => SquadAction::Regroup,
            ScenarioAction::HoldPosition => SquadAction::HoldPosition,
            ScenarioAction::MoveTo { x, y } => SquadAction::MoveTo {
                position: Position::new(*x, *y),
            },
            ScenarioAction::Attack { target } => SquadAction::Attack {
                target: sandbox
                    .agent_named(target)
                    .ok_or_else(|| format!("Unknown attack target '{}'", target))?,
            },
            ScenarioAction::Disband => SquadAction::Disband,
        };

        let id = match sandbox.controlled_squad() {
            Some(id) => id,
            None => {
                warn!("No controlled squad for {} at tick {}", action, scheduled.tick);

                return Ok(());
            }
        };

        let interval = scheduled
            .interval_seconds
            .unwrap_or(sandbox.settings().squad.action_interval_seconds);
        let queue = scheduled.queue;

        sandbox.with_squad(id, |squad| {
            if queue {
                squad.queue_next(action);
            } else {
                squad.set_action(action, interval);
            }
        });

        info!("Scheduled {} on squad {} at tick {}", action, id, scheduled.tick);

        Ok(())
    }
}
