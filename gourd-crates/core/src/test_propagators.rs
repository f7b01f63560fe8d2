//! Propagators for testing the engine and the state.
use std::cell::RefCell;
use std::rc::Rc;

use enumset::EnumSet;

use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::propagation::Domains;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorEventType;
use crate::propagation::ReadDomains;
use crate::variables::IntEvent;
use crate::variables::VarId;

/// A call the engine made into a [`RecordingPropagator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Propagate {
        name: &'static str,
        event_type: PropagatorEventType,
    },
    Fine {
        name: &'static str,
        local_id: LocalId,
        events: EnumSet<IntEvent>,
    },
}

pub(crate) type CallLog = Rc<RefCell<Vec<Call>>>;

pub(crate) fn take_calls(log: &CallLog) -> Vec<Call> {
    std::mem::take(&mut *log.borrow_mut())
}

/// Creates a [`RecordingPropagator`] which writes every call into a shared log.
#[derive(Clone, Debug)]
pub(crate) struct Recorder {
    name: &'static str,
    scope: Vec<VarId>,
    priority: Priority,
    conditions: EnumSet<IntEvent>,
    fine: bool,
    delay: Option<PropagatorEventType>,
    raise: Option<(VarId, i32)>,
    log: CallLog,
}

impl Recorder {
    pub(crate) fn new(name: &'static str, scope: &[VarId], log: &CallLog) -> Self {
        Recorder {
            name,
            scope: scope.to_vec(),
            priority: Priority::VerySlow,
            conditions: IntEvent::ALL,
            fine: false,
            delay: None,
            raise: None,
            log: Rc::clone(log),
        }
    }

    pub(crate) fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub(crate) fn with_conditions(mut self, conditions: EnumSet<IntEvent>) -> Self {
        self.conditions = conditions;
        self
    }

    pub(crate) fn fine(mut self) -> Self {
        self.fine = true;
        self
    }

    /// Every fine call requests a delayed propagation of the given type.
    pub(crate) fn delaying(mut self, event_type: PropagatorEventType) -> Self {
        self.delay = Some(event_type);
        self
    }

    /// Every full or custom propagation raises the lower bound of the variable to the value.
    pub(crate) fn raising(mut self, variable: VarId, value: i32) -> Self {
        self.raise = Some((variable, value));
        self
    }
}

impl PropagatorConstructor for Recorder {
    type PropagatorImpl = RecordingPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        for &variable in &self.scope {
            let _ = context.register(variable);
        }
        RecordingPropagator { recorder: self }
    }
}

#[derive(Debug)]
pub(crate) struct RecordingPropagator {
    recorder: Recorder,
}

impl Propagator for RecordingPropagator {
    fn name(&self) -> &str {
        self.recorder.name
    }

    fn priority(&self) -> Priority {
        self.recorder.priority
    }

    fn propagation_conditions(&self, _local_id: LocalId) -> EnumSet<IntEvent> {
        self.recorder.conditions
    }

    fn reacts_to_fine_events(&self) -> bool {
        self.recorder.fine
    }

    fn propagate(
        &mut self,
        mut context: PropagationContext,
        event_type: PropagatorEventType,
    ) -> PropagationStatus {
        self.recorder.log.borrow_mut().push(Call::Propagate {
            name: self.recorder.name,
            event_type,
        });

        if let Some((variable, value)) = self.recorder.raise {
            let _ = context.update_lower_bound(variable, value)?;
        }
        Ok(())
    }

    fn propagate_fine(
        &mut self,
        mut context: PropagationContext,
        local_id: LocalId,
        events: EnumSet<IntEvent>,
    ) -> PropagationStatus {
        self.recorder.log.borrow_mut().push(Call::Fine {
            name: self.recorder.name,
            local_id,
            events,
        });

        if let Some(event_type) = self.recorder.delay {
            context.force_propagate(event_type);
        }
        Ok(())
    }
}

/// `x < y`, filtering on bounds.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LessThan {
    pub(crate) x: VarId,
    pub(crate) y: VarId,
}

impl PropagatorConstructor for LessThan {
    type PropagatorImpl = LessThan;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let _ = context.register(self.x);
        let _ = context.register(self.y);
        self
    }
}

impl Propagator for LessThan {
    fn name(&self) -> &str {
        "LessThan"
    }

    fn priority(&self) -> Priority {
        Priority::Binary
    }

    fn propagation_conditions(&self, local_id: LocalId) -> EnumSet<IntEvent> {
        if local_id.index() == 0 {
            IntEvent::LOWER_BOUND
        } else {
            IntEvent::UPPER_BOUND
        }
    }

    fn propagate(
        &mut self,
        mut context: PropagationContext,
        _event_type: PropagatorEventType,
    ) -> PropagationStatus {
        let y_max = context.upper_bound(self.y);
        let _ = context.update_upper_bound(self.x, y_max - 1)?;
        let x_min = context.lower_bound(self.x);
        let _ = context.update_lower_bound(self.y, x_min + 1)?;
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        if domains.upper_bound(self.x) < domains.lower_bound(self.y) {
            Entailment::True
        } else if domains.lower_bound(self.x) >= domains.upper_bound(self.y) {
            Entailment::False
        } else {
            Entailment::Undefined
        }
    }
}

/// `x != y`, removing the value of a fixed variable from the other one and becoming passive
/// afterwards.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NotEqual {
    pub(crate) x: VarId,
    pub(crate) y: VarId,
}

impl PropagatorConstructor for NotEqual {
    type PropagatorImpl = NotEqual;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let _ = context.register(self.x);
        let _ = context.register(self.y);
        self
    }
}

impl Propagator for NotEqual {
    fn name(&self) -> &str {
        "NotEqual"
    }

    fn priority(&self) -> Priority {
        Priority::Binary
    }

    fn propagation_conditions(&self, _local_id: LocalId) -> EnumSet<IntEvent> {
        IntEvent::INSTANTIATE
    }

    fn propagate(
        &mut self,
        mut context: PropagationContext,
        _event_type: PropagatorEventType,
    ) -> PropagationStatus {
        if let Some(value) = context.fixed_value(self.x) {
            let _ = context.remove_value(self.y, value)?;
            context.set_passive();
        } else if let Some(value) = context.fixed_value(self.y) {
            let _ = context.remove_value(self.x, value)?;
            context.set_passive();
        }
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        match (domains.fixed_value(self.x), domains.fixed_value(self.y)) {
            (Some(x), Some(y)) => Entailment::from(x != y),
            _ if domains.upper_bound(self.x) < domains.lower_bound(self.y)
                || domains.upper_bound(self.y) < domains.lower_bound(self.x) =>
            {
                Entailment::True
            }
            _ => Entailment::Undefined,
        }
    }
}
