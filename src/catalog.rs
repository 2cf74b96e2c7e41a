//! Catalog — the curriculum and the "currently selected lesson" register.
//!
//! Lesson selection is observable: `subscribe` hands out a channel receiver
//! and every successful `select` pushes the new lesson to it. Consumers
//! drain their receiver on their own schedule.

use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LessonKind {
    FlowElements,
    Flow,
    Loop,
    Array,
    Function,
    #[serde(rename = "softskills")]
    SoftSkills,
    /// Any kind this build does not know how to draw.
    #[serde(other)]
    Unknown,
}

/// Which loop scene a `Loop` lesson shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopVariant {
    /// `for`: a fixed number of laps.
    Bounded,
    /// `while`: a guard checked before every cycle.
    Guarded,
    /// `while (true)`: never stops on its own.
    Unbounded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub module_id: String,
    pub kind: LessonKind,
    #[serde(default)]
    pub description: String,
}

impl Lesson {
    pub fn new(id: &str, module_id: &str, kind: LessonKind, title: &str, description: &str) -> Self {
        Lesson {
            id: id.to_string(),
            title: title.to_string(),
            module_id: module_id.to_string(),
            kind,
            description: description.to_string(),
        }
    }

    /// Loop scene for `Loop` lessons, chosen by lesson id.
    pub fn loop_variant(&self) -> Option<LoopVariant> {
        if self.kind != LessonKind::Loop {
            return None;
        }
        Some(match self.id.as_str() {
            "for-loop" => LoopVariant::Bounded,
            "infinite-loop" => LoopVariant::Unbounded,
            _ => LoopVariant::Guarded,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub lessons: Vec<Lesson>,
}

pub struct Catalog {
    modules: Vec<Module>,
    selected: String,
    subscribers: Vec<Sender<Lesson>>,
}

impl Catalog {
    /// Build a catalog. The first lesson is selected. Lessons get their
    /// `module_id` filled in from the module they are listed under.
    pub fn new(mut modules: Vec<Module>) -> Self {
        for module in &mut modules {
            for lesson in &mut module.lessons {
                lesson.module_id = module.id.clone();
            }
        }
        let selected = modules
            .iter()
            .flat_map(|m| m.lessons.first())
            .next()
            .map(|l| l.id.clone())
            .unwrap_or_default();
        Catalog {
            modules,
            selected,
            subscribers: Vec::new(),
        }
    }

    /// Parse a curriculum: a JSON array of modules.
    pub fn from_json(json: &str) -> Result<Self> {
        let modules: Vec<Module> = serde_json::from_str(json)?;
        Ok(Self::new(modules))
    }

    pub fn builtin() -> Self {
        use LessonKind::*;

        let module = |id: &str, title: &str, lessons: Vec<Lesson>| Module {
            id: id.to_string(),
            title: title.to_string(),
            lessons,
        };

        Self::new(vec![
            module("control-flow", "Module 2: Control Flow", vec![
                Lesson::new("flow-shapes", "", FlowElements, "Diagram Elements",
                    "Meet the basic shapes: start, process and decision."),
                Lesson::new("comparison", "", Flow, "Operators & Comparison",
                    "How computers compare values."),
                Lesson::new("if-else", "", Flow, "The Decision (If/Else)",
                    "Take different paths depending on a condition."),
                Lesson::new("age-check", "", Flow, "Exercise: Of Age",
                    "Follow the logic that checks someone's age."),
            ]),
            module("loops", "Module 3: Loops", vec![
                Lesson::new("while-loop", "", Loop, "While Loop",
                    "The guard: repeat an action only while the condition holds."),
                Lesson::new("for-loop", "", Loop, "For Loop",
                    "The conductor: repeat an exact number of times."),
                Lesson::new("infinite-loop", "", Loop, "Infinite Loop",
                    "The hamster wheel: learn to keep code from running forever."),
            ]),
            module("data", "Module 4: Data Structures", vec![
                Lesson::new("array-index", "", Array, "Arrays & Indexes",
                    "An ordered collection of elements."),
                Lesson::new("array-ops", "", Array, "Operations (Push/Pop)",
                    "Changing the list on the fly."),
            ]),
            module("functions", "Module 5: Functions", vec![
                Lesson::new("function-machine", "", Function, "The Function Machine",
                    "Input, process and output (return)."),
            ]),
            module("soft-skills", "Module 6: Soft Skills", vec![
                Lesson::new("debugging", "", SoftSkills, "Debugging & Googling",
                    "Untangle problems like a pro."),
            ]),
        ])
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|m| m.lessons.iter())
    }

    pub fn get_lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons().find(|l| l.id == id)
    }

    pub fn module_of(&self, lesson: &Lesson) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == lesson.module_id)
    }

    pub fn selected_id(&self) -> &str {
        &self.selected
    }

    /// The selected lesson, falling back to the first lesson when the
    /// selection no longer resolves. `None` only for an empty catalog.
    pub fn selected(&self) -> Option<&Lesson> {
        self.get_lesson(&self.selected)
            .or_else(|| self.lessons().next())
    }

    /// Select a lesson and notify subscribers.
    pub fn select(&mut self, id: &str) -> Result<Lesson> {
        let lesson = self
            .get_lesson(id)
            .cloned()
            .ok_or_else(|| Error::LessonNotFound(id.to_string()))?;
        info!("selected lesson {id}");
        self.selected = lesson.id.clone();

        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(lesson.clone()).is_ok());
        if self.subscribers.len() < before {
            debug!("pruned {} closed subscribers", before - self.subscribers.len());
        }
        Ok(lesson)
    }

    pub fn subscribe(&mut self) -> Receiver<Lesson> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Id of the lesson `delta` steps away from `id` in curriculum order,
    /// clamped to the ends.
    pub fn neighbor(&self, id: &str, delta: isize) -> Option<&str> {
        let ids: Vec<&str> = self.lessons().map(|l| l.id.as_str()).collect();
        let pos = ids.iter().position(|l| *l == id)? as isize;
        let target = (pos + delta).clamp(0, ids.len() as isize - 1) as usize;
        ids.get(target).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lists_every_kind() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.modules().len(), 5);
        assert_eq!(catalog.lessons().count(), 11);
        for kind in [
            LessonKind::FlowElements,
            LessonKind::Flow,
            LessonKind::Loop,
            LessonKind::Array,
            LessonKind::Function,
            LessonKind::SoftSkills,
        ] {
            assert!(catalog.lessons().any(|l| l.kind == kind), "{kind:?} missing");
        }
        assert_eq!(catalog.selected().map(|l| l.id.as_str()), Some("flow-shapes"));
        assert_eq!(catalog.get_lesson("for-loop").map(|l| l.module_id.as_str()), Some("loops"));
    }

    #[test]
    fn loop_variant_follows_lesson_id() {
        let catalog = Catalog::builtin();
        let variant = |id| catalog.get_lesson(id).and_then(Lesson::loop_variant);
        assert_eq!(variant("for-loop"), Some(LoopVariant::Bounded));
        assert_eq!(variant("while-loop"), Some(LoopVariant::Guarded));
        assert_eq!(variant("infinite-loop"), Some(LoopVariant::Unbounded));
        assert_eq!(variant("comparison"), None);
    }

    #[test]
    fn select_notifies_subscribers() {
        let mut catalog = Catalog::builtin();
        let rx = catalog.subscribe();
        catalog.select("array-ops").expect("known lesson");
        assert_eq!(rx.try_recv().map(|l| l.id), Ok("array-ops".to_string()));
        assert_eq!(catalog.selected_id(), "array-ops");
    }

    #[test]
    fn select_unknown_is_error_and_keeps_selection() {
        let mut catalog = Catalog::builtin();
        let rx = catalog.subscribe();
        assert!(matches!(catalog.select("nope"), Err(Error::LessonNotFound(_))));
        assert_eq!(catalog.selected_id(), "flow-shapes");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut catalog = Catalog::builtin();
        drop(catalog.subscribe());
        let live = catalog.subscribe();
        catalog.select("debugging").expect("known lesson");
        assert_eq!(catalog.subscribers.len(), 1);
        assert!(live.try_recv().is_ok());
    }

    #[test]
    fn neighbor_clamps_at_ends() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.neighbor("flow-shapes", -1), Some("flow-shapes"));
        assert_eq!(catalog.neighbor("flow-shapes", 1), Some("comparison"));
        assert_eq!(catalog.neighbor("debugging", 3), Some("debugging"));
        assert_eq!(catalog.neighbor("missing", 1), None);
    }

    #[test]
    fn unknown_kind_parses_from_json() {
        let json = r#"[{"id":"m","title":"M","lessons":[
            {"id":"a","title":"A","kind":"loop"},
            {"id":"b","title":"B","kind":"hologram"}
        ]}]"#;
        let catalog = Catalog::from_json(json).expect("valid curriculum");
        assert_eq!(catalog.get_lesson("b").map(|l| l.kind), Some(LessonKind::Unknown));
        assert_eq!(catalog.get_lesson("a").map(|l| l.module_id.as_str()), Some("m"));
    }
}
