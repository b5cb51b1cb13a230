//! Boolean logic gate.

use engine_param::{KvList, Param};
use engine_physics::Transform;
use engine_world::{Actor, ActorDefinition, ActorId, ActorRegistry, MapEnv};
use tracing::error;

use crate::ACTOR_TYPE_LOGIC_BINARY;

pub const LOGIC_BINARY_ACTOR_NAME: &str = "logic_binary";

pub const INPUT_OPERAND_A: &str = "operand_a";
pub const INPUT_OPERAND_B: &str = "operand_b";
pub const INPUT_EXECUTE: &str = "execute";

pub const OUTPUT_ON_TRUE: &str = "on_true";
pub const OUTPUT_ON_FALSE: &str = "on_false";
pub const OUTPUT_EXECUTION_RESULT: &str = "execution_result";

/// Operation codes for the `operation` construction param.
pub const OP_AND: u8 = 0;
pub const OP_OR: u8 = 1;
pub const OP_NOT: u8 = 2;

#[derive(Debug)]
pub struct LogicBinaryState {
    pub operand_a: bool,
    pub operand_b: bool,
    pub operation: u8,
}

fn operand_a_handler(this: &mut Actor, _sender: ActorId, param: &Param, _env: &mut MapEnv) {
    if let (Some(state), Param::Bool(value)) = (this.state_mut::<LogicBinaryState>(), param) {
        state.operand_a = *value;
    }
}

fn operand_b_handler(this: &mut Actor, _sender: ActorId, param: &Param, _env: &mut MapEnv) {
    if let (Some(state), Param::Bool(value)) = (this.state_mut::<LogicBinaryState>(), param) {
        state.operand_b = *value;
    }
}

fn execute_handler(this: &mut Actor, _sender: ActorId, _param: &Param, env: &mut MapEnv) {
    let Some(state) = this.state::<LogicBinaryState>() else {
        return;
    };
    let result = match state.operation {
        OP_AND => state.operand_a && state.operand_b,
        OP_OR => state.operand_a || state.operand_b,
        OP_NOT => !state.operand_a,
        other => {
            error!(operation = other, "unknown binary operation");
            return;
        }
    };
    if result {
        env.fire_output(this, OUTPUT_ON_TRUE, &Param::None);
    } else {
        env.fire_output(this, OUTPUT_ON_FALSE, &Param::None);
    }
    env.fire_output(this, OUTPUT_EXECUTION_RESULT, &Param::Bool(result));
}

fn init(this: &mut Actor, params: &mut KvList, _transform: &Transform, _env: &mut MapEnv) {
    this.set_state(LogicBinaryState {
        operand_a: false,
        operand_b: false,
        operation: params.get_byte("operation", OP_AND),
    });
}

pub fn register(registry: &mut ActorRegistry) {
    registry.register(
        LOGIC_BINARY_ACTOR_NAME,
        ActorDefinition::new(ACTOR_TYPE_LOGIC_BINARY)
            .with_init(init)
            .with_input(INPUT_OPERAND_A, operand_a_handler)
            .with_input(INPUT_OPERAND_B, operand_b_handler)
            .with_input(INPUT_EXECUTE, execute_handler),
    );
}
