//! Static achievement catalogs.
//!
//! Two lists exist. [`STAT_ACHIEVEMENTS`] is checked after every answer and
//! recorded in the gamification profile. [`MILESTONES`] is checked when a
//! chain is finished and recorded in the separate unlocked list the profile
//! page reads; its xp rewards only feed the profile page totals.

use std::fmt;

use crate::content::SimulationKind;
use crate::engine::recorder::ChainSummary;
use crate::gamification::profile::UserStats;

pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub condition: fn(&UserStats) -> bool,
}

impl fmt::Debug for AchievementDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AchievementDef")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

pub static STAT_ACHIEVEMENTS: [AchievementDef; 5] = [
    AchievementDef {
        id: "first_step",
        name: "Primer Paso",
        description: "Responde correctamente tu primera pregunta",
        condition: |s| s.total_correct >= 1,
    },
    AchievementDef {
        id: "scholar",
        name: "Estudioso",
        description: "Responde 10 preguntas correctamente",
        condition: |s| s.total_correct >= 10,
    },
    AchievementDef {
        id: "master",
        name: "Maestro",
        description: "Responde 50 preguntas correctamente",
        condition: |s| s.total_correct >= 50,
    },
    AchievementDef {
        id: "on_fire",
        name: "En Llamas",
        description: "Consigue una racha de 5 aciertos seguidos",
        condition: |s| s.current_streak >= 5,
    },
    AchievementDef {
        id: "unstoppable",
        name: "Imparable",
        description: "Consigue una racha de 10 aciertos seguidos",
        condition: |s| s.current_streak >= 10,
    },
];

pub fn stat_achievement(id: &str) -> Option<&'static AchievementDef> {
    STAT_ACHIEVEMENTS.iter().find(|def| def.id == id)
}

/// Facts about a chain the learner just finished.
#[derive(Debug, Clone)]
pub struct ChainCompletion<'a> {
    pub group: &'a str,
    pub summary: &'a ChainSummary,
    pub simulations: &'a [SimulationKind],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneRule {
    AnyChainCompleted,
    ChainCompleted(&'static str),
    SimulationCompleted(SimulationKind),
    NoMistakes,
    FinishedWithinMs(u64),
}

impl MilestoneRule {
    pub fn is_met(&self, completion: &ChainCompletion<'_>) -> bool {
        match self {
            Self::AnyChainCompleted => true,
            Self::ChainCompleted(group) => completion.group == *group,
            Self::SimulationCompleted(kind) => completion.simulations.contains(kind),
            Self::NoMistakes => completion.summary.mistakes == 0,
            Self::FinishedWithinMs(limit) => completion.summary.total_time_ms < *limit,
        }
    }
}

#[derive(Debug)]
pub struct Milestone {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub xp_reward: Option<u64>,
    pub rule: MilestoneRule,
}

pub static MILESTONES: [Milestone; 5] = [
    Milestone {
        id: "algo_1",
        title: "Pensamiento Algorítmico I",
        description: "Completaste tu primera lección de algoritmos.",
        xp_reward: Some(50),
        rule: MilestoneRule::ChainCompleted("Python-Fundamentos-Algoritmos"),
    },
    Milestone {
        id: "first_steps",
        title: "Primeros Pasos",
        description: "Completaste cualquier lección.",
        xp_reward: Some(20),
        rule: MilestoneRule::AnyChainCompleted,
    },
    Milestone {
        id: "rocket_science",
        title: "Ciencia de Cohetes",
        description: "Lanzaste el cohete en la simulación.",
        xp_reward: Some(100),
        rule: MilestoneRule::SimulationCompleted(SimulationKind::RocketLaunch),
    },
    Milestone {
        id: "clean_code",
        title: "Código Limpio",
        description: "Resolviste un ejercicio sin errores.",
        xp_reward: Some(80),
        rule: MilestoneRule::NoMistakes,
    },
    Milestone {
        id: "fast_learner",
        title: "Aprendiz Veloz",
        description: "Completaste una lección en menos de 1 minuto.",
        xp_reward: Some(50),
        rule: MilestoneRule::FinishedWithinMs(crate::constants::FAST_LEARNER_MAX_MS),
    },
];

pub fn milestone(id: &str) -> Option<&'static Milestone> {
    MILESTONES.iter().find(|m| m.id == id)
}

/// Milestones whose rule holds for `completion`, in catalog order.
pub fn met_milestones(completion: &ChainCompletion<'_>) -> Vec<&'static Milestone> {
    MILESTONES
        .iter()
        .filter(|m| m.rule.is_met(completion))
        .collect()
}
