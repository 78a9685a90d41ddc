use crate::side::SideId;
use schema::{AbilityId, ItemId, Stat, StatusKind, Terrain, Weather};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hazard {
    StealthRock,
    Spikes,
    ToxicSpikes,
    StickyWeb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideCondition {
    Reflect,
    LightScreen,
    AuroraVeil,
    Tailwind,
}

impl fmt::Display for SideCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SideCondition::Reflect => "Reflect",
            SideCondition::LightScreen => "Light Screen",
            SideCondition::AuroraVeil => "Aurora Veil",
            SideCondition::Tailwind => "the tailwind",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageCause {
    Move,
    Recoil,
    Crash,
    LifeOrb,
    RockyHelmet,
    Status(StatusKind),
    Weather(Weather),
    Hazard(Hazard),
    LeechSeed,
    BlackSludge,
    Confusion,
    Substitute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealCause {
    Move,
    Drain,
    Rest,
    LeechSeed,
    Item(ItemId),
    Ability(AbilityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionFailureReason {
    Asleep,
    Frozen,
    FullyParalyzed,
    Flinched,
    Recharging,
    Loafing,
    Taunted,
    AssaultVest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatileKind {
    Confusion,
    LeechSeed,
    Taunt,
    Encore,
    Substitute,
    PerishSong,
    Drowsy,
    DestinyBond,
    HealBlock,
    Charge,
    Roost,
}

/// Why a status did not stick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusRejection {
    AbilityImmunity(AbilityId),
    AlreadyStatused,
    AlreadyActive,
    TypeImmunity,
    Weather,
    Terrain,
    Substitute,
}

/// Everything that happened during a resolution, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    TurnStarted { turn: u32 },
    SentOut { side: SideId, name: String },
    Withdrew { side: SideId, name: String },
    MoveUsed { side: SideId, name: String, move_name: String },
    MoveMissed { name: String },
    MoveFailed { name: String },
    Protected { name: String },
    NoEffect { target: String },
    SuperEffective,
    NotVeryEffective,
    CriticalHit,
    Damaged { target: String, amount: u16, remaining: u16, cause: DamageCause },
    SubstituteHit { target: String, amount: u16 },
    Healed { target: String, amount: u16, cause: HealCause },
    Fainted { side: SideId, name: String },
    StatusInflicted { target: String, status: StatusKind },
    StatusBlocked { target: String, status: StatusKind, reason: StatusRejection },
    StatusCured { target: String, status: StatusKind },
    Immobilized { name: String, reason: ActionFailureReason },
    StatChanged { target: String, stat: Stat, delta: i8 },
    StatUnchanged { target: String, stat: Stat, rising: bool },
    StatDropBlocked { target: String, by: String },
    StagesReset,
    AbilityActivated { name: String, ability: AbilityId },
    AbilityCopied { name: String, from: String, ability: AbilityId },
    ItemActivated { name: String, item: ItemId },
    ItemRemoved { name: String, item: ItemId },
    ItemsSwapped { name: String, target: String },
    HungOn { name: String, item: ItemId },
    WeatherStarted { weather: Weather },
    WeatherEnded { weather: Weather },
    TerrainStarted { terrain: Terrain },
    TerrainEnded { terrain: Terrain },
    SideConditionStarted { side: SideId, condition: SideCondition },
    SideConditionEnded { side: SideId, condition: SideCondition },
    ScreensShattered { side: SideId },
    HazardSet { side: SideId, hazard: Hazard },
    HazardsAbsorbed { name: String },
    HazardsIgnored { name: String, item: ItemId },
    Charging { name: String, move_name: String },
    VolatileStarted { target: String, kind: VolatileKind },
    VolatileEnded { target: String, kind: VolatileKind },
    PerishCount { name: String, count: u8 },
    DestinyBondTriggered { name: String },
    BattleEnded { winner: SideId },
    Diagnostic { message: String },
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEvent::TurnStarted { turn } => write!(f, "== Turn {} ==", turn),
            BattleEvent::SentOut { side, name } => write!(f, "Side {} sent out {}!", side, name),
            BattleEvent::Withdrew { side, name } => {
                write!(f, "Side {} withdrew {}.", side, name)
            }
            BattleEvent::MoveUsed { name, move_name, .. } => {
                write!(f, "{} used {}!", name, move_name)
            }
            BattleEvent::MoveMissed { name } => write!(f, "{}'s attack missed!", name),
            BattleEvent::MoveFailed { name } => write!(f, "{}'s move failed!", name),
            BattleEvent::Protected { name } => write!(f, "{} protected itself!", name),
            BattleEvent::NoEffect { target } => write!(f, "It doesn't affect {}...", target),
            BattleEvent::SuperEffective => write!(f, "It's super effective!"),
            BattleEvent::NotVeryEffective => write!(f, "It's not very effective..."),
            BattleEvent::CriticalHit => write!(f, "A critical hit!"),
            BattleEvent::Damaged {
                target,
                amount,
                remaining,
                cause,
            } => {
                match cause {
                    DamageCause::Move => write!(f, "{} took {} damage", target, amount)?,
                    DamageCause::Recoil => {
                        write!(f, "{} is damaged by recoil ({})", target, amount)?
                    }
                    DamageCause::Crash => {
                        write!(f, "{} kept going and crashed ({})", target, amount)?
                    }
                    DamageCause::LifeOrb => {
                        write!(f, "{} lost {} HP to its Life Orb", target, amount)?
                    }
                    DamageCause::RockyHelmet => {
                        write!(f, "{} was hurt by the Rocky Helmet ({})", target, amount)?
                    }
                    DamageCause::Status(status) => {
                        write!(f, "{} is hurt by its {} ({})", target, status, amount)?
                    }
                    DamageCause::Weather(weather) => {
                        write!(f, "{} is buffeted by the {} ({})", target, weather, amount)?
                    }
                    DamageCause::Hazard(Hazard::StealthRock) => {
                        write!(f, "Pointed stones dug into {} ({})", target, amount)?
                    }
                    DamageCause::Hazard(_) => {
                        write!(f, "{} is hurt by the spikes ({})", target, amount)?
                    }
                    DamageCause::LeechSeed => {
                        write!(f, "{}'s health is sapped by Leech Seed ({})", target, amount)?
                    }
                    DamageCause::BlackSludge => {
                        write!(f, "{} is hurt by its Black Sludge ({})", target, amount)?
                    }
                    DamageCause::Confusion => {
                        write!(f, "It hurt itself in its confusion! ({})", amount)?
                    }
                    DamageCause::Substitute => {
                        write!(f, "{} put in a substitute ({})", target, amount)?
                    }
                }
                write!(f, " [{} HP left]", remaining)
            }
            BattleEvent::SubstituteHit { target, amount } => write!(
                f,
                "The substitute took {} damage for {}!",
                amount, target
            ),
            BattleEvent::Healed {
                target,
                amount,
                cause,
            } => match cause {
                HealCause::Move => write!(f, "{} restored {} HP.", target, amount),
                HealCause::Drain => write!(f, "{} drained {} HP.", target, amount),
                HealCause::Rest => {
                    write!(f, "{} slept and became healthy! (+{})", target, amount)
                }
                HealCause::LeechSeed => {
                    write!(f, "{} absorbed {} HP from the seed.", target, amount)
                }
                HealCause::Item(item) => write!(
                    f,
                    "{} restored {} HP with its {}.",
                    target,
                    amount,
                    item.display_name()
                ),
                HealCause::Ability(ability) => write!(
                    f,
                    "{}'s {} restored {} HP.",
                    target,
                    ability.display_name(),
                    amount
                ),
            },
            BattleEvent::Fainted { name, .. } => write!(f, "{} fainted!", name),
            BattleEvent::StatusInflicted { target, status } => match status {
                StatusKind::Sleep => write!(f, "{} fell asleep!", target),
                StatusKind::Freeze => write!(f, "{} was frozen solid!", target),
                StatusKind::Paralysis => write!(f, "{} is paralyzed!", target),
                StatusKind::Burn => write!(f, "{} was burned!", target),
                StatusKind::Poison => write!(f, "{} was poisoned!", target),
                StatusKind::BadPoison => write!(f, "{} was badly poisoned!", target),
                StatusKind::Confusion => write!(f, "{} became confused!", target),
            },
            BattleEvent::StatusBlocked {
                target,
                status,
                reason,
            } => match reason {
                StatusRejection::AbilityImmunity(ability) => write!(
                    f,
                    "{}'s {} prevents {}!",
                    target,
                    ability.display_name(),
                    status
                ),
                StatusRejection::AlreadyStatused | StatusRejection::AlreadyActive => {
                    write!(f, "{} can't be afflicted with {} right now.", target, status)
                }
                StatusRejection::TypeImmunity => {
                    write!(f, "{} is unaffected by {}.", target, status)
                }
                StatusRejection::Weather => {
                    write!(f, "The weather protects {} from {}.", target, status)
                }
                StatusRejection::Terrain => {
                    write!(f, "The terrain protects {} from {}.", target, status)
                }
                StatusRejection::Substitute => {
                    write!(f, "{}'s substitute blocked the {}.", target, status)
                }
            },
            BattleEvent::StatusCured { target, status } => match status {
                StatusKind::Sleep => write!(f, "{} woke up!", target),
                StatusKind::Freeze => write!(f, "{} thawed out!", target),
                StatusKind::Confusion => write!(f, "{} snapped out of its confusion!", target),
                other => write!(f, "{} was cured of its {}.", target, other),
            },
            BattleEvent::Immobilized { name, reason } => match reason {
                ActionFailureReason::Asleep => write!(f, "{} is fast asleep.", name),
                ActionFailureReason::Frozen => write!(f, "{} is frozen solid!", name),
                ActionFailureReason::FullyParalyzed => {
                    write!(f, "{} is paralyzed! It can't move!", name)
                }
                ActionFailureReason::Flinched => write!(f, "{} flinched!", name),
                ActionFailureReason::Recharging => write!(f, "{} must recharge!", name),
                ActionFailureReason::Loafing => write!(f, "{} is loafing around!", name),
                ActionFailureReason::Taunted => {
                    write!(f, "{} can't use status moves after the taunt!", name)
                }
                ActionFailureReason::AssaultVest => {
                    write!(f, "{} can't use status moves with its Assault Vest!", name)
                }
            },
            BattleEvent::StatChanged { target, stat, delta } => {
                let adverb = match delta.abs() {
                    1 => "",
                    2 => " sharply",
                    _ => " drastically",
                };
                let verb = if *delta > 0 { "rose" } else { "fell" };
                write!(f, "{}'s {}{} {}!", target, stat, adverb, verb)
            }
            BattleEvent::StatUnchanged {
                target,
                stat,
                rising,
            } => {
                let direction = if *rising { "higher" } else { "lower" };
                write!(f, "{}'s {} won't go any {}!", target, stat, direction)
            }
            BattleEvent::StatDropBlocked { target, by } => {
                write!(f, "{}'s {} prevents its stats from being lowered!", target, by)
            }
            BattleEvent::StagesReset => write!(f, "All stat changes were eliminated!"),
            BattleEvent::AbilityActivated { name, ability } => {
                write!(f, "[{}'s {}]", name, ability.display_name())
            }
            BattleEvent::AbilityCopied {
                name,
                from,
                ability,
            } => write!(
                f,
                "{} traced {}'s {}!",
                name,
                from,
                ability.display_name()
            ),
            BattleEvent::ItemActivated { name, item } => {
                write!(f, "[{}'s {}]", name, item.display_name())
            }
            BattleEvent::ItemRemoved { name, item } => {
                write!(f, "{} lost its {}!", name, item.display_name())
            }
            BattleEvent::ItemsSwapped { name, target } => {
                write!(f, "{} switched items with {}!", name, target)
            }
            BattleEvent::HungOn { name, item } => {
                write!(f, "{} hung on using its {}!", name, item.display_name())
            }
            BattleEvent::WeatherStarted { weather } => write!(f, "{}", weather.start_message()),
            BattleEvent::WeatherEnded { weather } => write!(f, "{}", weather.end_message()),
            BattleEvent::TerrainStarted { terrain } => {
                write!(f, "{} terrain covered the battlefield!", terrain)
            }
            BattleEvent::TerrainEnded { terrain } => write!(f, "The {} terrain faded.", terrain),
            BattleEvent::SideConditionStarted { side, condition } => {
                write!(f, "{} now protects side {}!", condition, side)
            }
            BattleEvent::SideConditionEnded { side, condition } => {
                write!(f, "Side {}'s {} wore off.", side, condition)
            }
            BattleEvent::ScreensShattered { side } => {
                write!(f, "Side {}'s screens were shattered!", side)
            }
            BattleEvent::HazardSet { side, hazard } => match hazard {
                Hazard::StealthRock => {
                    write!(f, "Pointed stones float around side {}!", side)
                }
                Hazard::Spikes => write!(f, "Spikes were scattered around side {}!", side),
                Hazard::ToxicSpikes => {
                    write!(f, "Poison spikes were scattered around side {}!", side)
                }
                Hazard::StickyWeb => write!(f, "A sticky web spreads out on side {}!", side),
            },
            BattleEvent::HazardsAbsorbed { name } => {
                write!(f, "{} absorbed the poison spikes!", name)
            }
            BattleEvent::HazardsIgnored { name, item } => write!(
                f,
                "{}'s {} kept it clear of the hazards.",
                name,
                item.display_name()
            ),
            BattleEvent::Charging { name, move_name } => {
                write!(f, "{} is readying {}!", name, move_name)
            }
            BattleEvent::VolatileStarted { target, kind } => match kind {
                VolatileKind::Confusion => write!(f, "{} became confused!", target),
                VolatileKind::LeechSeed => write!(f, "{} was seeded!", target),
                VolatileKind::Taunt => write!(f, "{} fell for the taunt!", target),
                VolatileKind::Encore => write!(f, "{} received an encore!", target),
                VolatileKind::Substitute => write!(f, "{} put in a substitute!", target),
                VolatileKind::PerishSong => {
                    write!(f, "{} will faint in three turns!", target)
                }
                VolatileKind::Drowsy => write!(f, "{} grew drowsy!", target),
                VolatileKind::DestinyBond => {
                    write!(f, "{} is hoping to take its attacker down with it!", target)
                }
                VolatileKind::HealBlock => write!(f, "{} was prevented from healing!", target),
                VolatileKind::Charge => write!(f, "{} began charging power!", target),
                VolatileKind::Roost => write!(f, "{} landed to roost.", target),
            },
            BattleEvent::VolatileEnded { target, kind } => match kind {
                VolatileKind::Taunt => write!(f, "{}'s taunt wore off!", target),
                VolatileKind::Encore => write!(f, "{}'s encore ended!", target),
                VolatileKind::Substitute => write!(f, "{}'s substitute faded!", target),
                VolatileKind::HealBlock => {
                    write!(f, "{}'s heal block wore off!", target)
                }
                other => write!(f, "{} is no longer affected by {:?}.", target, other),
            },
            BattleEvent::PerishCount { name, count } => {
                write!(f, "{}'s perish count fell to {}.", name, count)
            }
            BattleEvent::DestinyBondTriggered { name } => {
                write!(f, "{} took its attacker down with it!", name)
            }
            BattleEvent::BattleEnded { winner } => write!(f, "Side {} won the battle!", winner),
            BattleEvent::Diagnostic { message } => write!(f, "[diagnostic] {}", message),
        }
    }
}

/// Ordered collection of the events produced by one resolution.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Rendered log lines, one per event.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(|e| e.to_string()).collect()
    }

    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        for line in self.lines() {
            println!("  {}", line);
        }
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{}", event)?;
        }
        Ok(())
    }
}
