use clap::Parser;
use enumset::EnumSet;
use gourd_core::propagation::LocalId;
use gourd_core::propagation::Priority;
use gourd_core::propagation::PropagationContext;
use gourd_core::propagation::Propagator;
use gourd_core::propagation::PropagatorConstructor;
use gourd_core::propagation::PropagatorConstructorContext;
use gourd_core::propagation::PropagatorEventType;
use gourd_core::propagation::ReadDomains;
use gourd_core::statistics::configure_statistic_logging;
use gourd_core::variables::IntEvent;
use gourd_core::variables::VarId;
use gourd_core::PropagationStatus;
use gourd_core::State;

#[derive(Parser)]
struct Cli {
    /// The size of the chess board.
    n: u32,

    /// Log the statistics of the kernel after the search.
    #[arg(short, long)]
    statistics: bool,
}

/// Two queens on different rows do not attack each other: `q_i != q_j` and `|q_i - q_j| !=
/// distance`.
#[derive(Clone, Copy, Debug)]
struct QueenPair {
    first: VarId,
    second: VarId,
    distance: i32,
}

impl PropagatorConstructor for QueenPair {
    type PropagatorImpl = QueenPair;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let _ = context.register(self.first);
        let _ = context.register(self.second);
        self
    }
}

impl Propagator for QueenPair {
    fn name(&self) -> &str {
        "QueenPair"
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
        let (fixed, other) = match (
            context.fixed_value(self.first),
            context.fixed_value(self.second),
        ) {
            (Some(column), _) => (column, self.second),
            (None, Some(column)) => (column, self.first),
            (None, None) => return Ok(()),
        };

        for column in [fixed, fixed - self.distance, fixed + self.distance] {
            let _ = context.remove_value(other, column)?;
        }
        context.set_passive();
        Ok(())
    }
}

fn solve(state: &mut State, queens: &[VarId]) -> bool {
    if state.propagate().is_err() {
        return false;
    }

    // First fail: branch on the queen with the fewest columns left.
    let Some(&queen) = queens
        .iter()
        .filter(|&&queen| !state.is_fixed(queen))
        .min_by_key(|&&queen| state.size(queen))
    else {
        return true;
    };

    let columns = state.values(queen).collect::<Vec<_>>();
    for column in columns {
        state.world_push();
        if state.instantiate_to(queen, column).is_ok() && solve(state, queens) {
            return true;
        }
        state.world_pop();
    }
    false
}

fn main() {
    env_logger::init();

    let Cli { n, statistics } = Cli::parse();

    if n < 2 {
        println!("Please provide an 'n > 1'");
        return;
    }
    if statistics {
        configure_statistic_logging("%%", None, None, None);
    }

    let mut state = State::default();
    let columns = (0..n as i32).collect::<Vec<_>>();
    let queens = (0..n)
        .map(|row| {
            let name = format!("q{row}");
            state.new_enumerated_variable(&columns, Some(&name))
        })
        .collect::<Vec<_>>();

    for (row, &first) in queens.iter().enumerate() {
        for (offset, &second) in queens[row + 1..].iter().enumerate() {
            let _ = state.add_propagator(QueenPair {
                first,
                second,
                distance: offset as i32 + 1,
            });
        }
    }

    if solve(&mut state, &queens) {
        let row_separator = format!("{}+", "+---".repeat(n as usize));

        for &queen in &queens {
            println!("{row_separator}");

            let queen_column = state.lower_bound(queen);
            for column in 0..n as i32 {
                let string = if queen_column == column { "| * " } else { "|   " };
                print!("{string}");
            }

            println!("|");
        }

        println!("{row_separator}");
    } else {
        println!("{n}-queens is unsatisfiable.");
    }

    state.log_statistics();
}
