//! Floating-point comparison gate.

use engine_param::{KvList, Param};
use engine_physics::Transform;
use engine_world::{Actor, ActorDefinition, ActorId, ActorRegistry, MapEnv};
use tracing::error;

use crate::ACTOR_TYPE_LOGIC_DECIMAL;

pub const LOGIC_DECIMAL_ACTOR_NAME: &str = "logic_decimal";

pub const INPUT_OPERAND_A: &str = "operand_a";
pub const INPUT_OPERAND_B: &str = "operand_b";
pub const INPUT_EXECUTE: &str = "execute";

pub const OUTPUT_ON_TRUE: &str = "on_true";
pub const OUTPUT_ON_FALSE: &str = "on_false";
pub const OUTPUT_EXECUTION_RESULT: &str = "execution_result";

/// Operation codes for the `operation` construction param.
pub const OP_EQUAL: u8 = 0;
pub const OP_GREATER_THAN: u8 = 1;
pub const OP_GREATER_THAN_OR_EQUAL: u8 = 2;
pub const OP_LESS_THAN: u8 = 3;
pub const OP_LESS_THAN_OR_EQUAL: u8 = 4;

#[derive(Debug)]
pub struct LogicDecimalState {
    pub operand_a: f32,
    pub operand_b: f32,
    pub operation: u8,
}

fn operand_a_handler(this: &mut Actor, _sender: ActorId, param: &Param, _env: &mut MapEnv) {
    if let (Some(state), Param::Float(value)) = (this.state_mut::<LogicDecimalState>(), param) {
        state.operand_a = *value;
    }
}

fn operand_b_handler(this: &mut Actor, _sender: ActorId, param: &Param, _env: &mut MapEnv) {
    if let (Some(state), Param::Float(value)) = (this.state_mut::<LogicDecimalState>(), param) {
        state.operand_b = *value;
    }
}

fn execute_handler(this: &mut Actor, _sender: ActorId, _param: &Param, env: &mut MapEnv) {
    let Some(state) = this.state::<LogicDecimalState>() else {
        return;
    };
    #[allow(clippy::float_cmp)]
    let result = match state.operation {
        OP_EQUAL => state.operand_a == state.operand_b,
        OP_GREATER_THAN => state.operand_a > state.operand_b,
        OP_GREATER_THAN_OR_EQUAL => state.operand_a >= state.operand_b,
        OP_LESS_THAN => state.operand_a < state.operand_b,
        OP_LESS_THAN_OR_EQUAL => state.operand_a <= state.operand_b,
        other => {
            error!(operation = other, "unknown decimal operation");
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
    this.set_state(LogicDecimalState {
        operand_a: params.get_float("operandA", 0.0),
        operand_b: params.get_float("operandB", 0.0),
        operation: params.get_byte("operation", OP_EQUAL),
    });
}

pub fn register(registry: &mut ActorRegistry) {
    registry.register(
        LOGIC_DECIMAL_ACTOR_NAME,
        ActorDefinition::new(ACTOR_TYPE_LOGIC_DECIMAL)
            .with_init(init)
            .with_input(INPUT_OPERAND_A, operand_a_handler)
            .with_input(INPUT_OPERAND_B, operand_b_handler)
            .with_input(INPUT_EXECUTE, execute_handler),
    );
}
