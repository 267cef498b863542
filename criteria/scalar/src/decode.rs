use alloy_dyn_abi::{DynSolValue, EventExt, JsonAbiExt};
use alloy_json_abi::{Event, Function};
use alloy_primitives::{hex, U256};

use crate::evidence::LogEntry;
use crate::types::{FieldIndex, ScalarError, ScalarResult};

fn decode_error(reason: impl Into<String>) -> ScalarError {
    ScalarError::DecodedArgsError(reason.into())
}

/// Decode a log into its arguments in declaration order, indexed and
/// non-indexed parameters interleaved as the event declares them.
pub fn decode_event_args(event: &Event, log: &LogEntry) -> ScalarResult<Vec<DynSolValue>> {
    let decoded = event
        .decode_log_parts(log.topics.iter().copied(), &log.data, true)
        .map_err(|e| decode_error(format!("event {}: {e}", event.name)))?;

    let mut indexed = decoded.indexed.into_iter();
    let mut body = decoded.body.into_iter();
    event
        .inputs
        .iter()
        .map(|param| {
            let next = if param.indexed {
                indexed.next()
            } else {
                body.next()
            };
            next.ok_or_else(|| decode_error(format!("event {}: missing `{}`", event.name, param.name)))
        })
        .collect()
}

/// Decode call input (selector included) against a function definition.
pub fn decode_call_args(function: &Function, input: &[u8]) -> ScalarResult<Vec<DynSolValue>> {
    if input.len() < 4 {
        return Err(decode_error("call input shorter than a selector"));
    }
    let (selector, args) = input.split_at(4);
    if selector != function.selector().as_slice() {
        return Err(decode_error(format!(
            "call selector 0x{} does not match {}",
            hex::encode(selector),
            function.signature()
        )));
    }

    function
        .abi_decode_input(args, true)
        .map_err(|e| decode_error(format!("function {}: {e}", function.name)))
}

/// Walk `index` into the decoded arguments.
///
/// The first segment selects a top-level argument; every further segment
/// requires the current value to be a tuple or array.
pub fn extract_field<'a>(
    args: &'a [DynSolValue],
    index: &FieldIndex,
) -> ScalarResult<&'a DynSolValue> {
    let segments = index.segments();
    let (first, rest) = segments
        .split_first()
        .ok_or_else(|| decode_error("empty field index"))?;

    let mut current = args
        .get(usize::from(*first))
        .ok_or_else(|| decode_error(format!("field {first} out of range ({} args)", args.len())))?;

    for segment in rest {
        let children = match current {
            DynSolValue::Tuple(values)
            | DynSolValue::Array(values)
            | DynSolValue::FixedArray(values) => values,
            _ => return Err(decode_error(format!("field {segments:?} is undefined"))),
        };
        current = children
            .get(usize::from(*segment))
            .ok_or_else(|| decode_error(format!("field {segments:?} is undefined")))?;
    }

    Ok(current)
}

/// Coerce a decoded value to an unsigned integer.
pub fn coerce_scalar(value: &DynSolValue) -> ScalarResult<U256> {
    match value {
        DynSolValue::Uint(v, _) => Ok(*v),
        DynSolValue::Int(v, _) if v.is_negative() => {
            Err(decode_error(format!("negative value {v} cannot be a scalar")))
        }
        DynSolValue::Int(v, _) => Ok(v.into_raw()),
        DynSolValue::Bool(b) => Ok(U256::from(u8::from(*b))),
        DynSolValue::Address(address) => Ok(U256::from_be_slice(address.as_slice())),
        DynSolValue::FixedBytes(word, size) => Ok(U256::from_be_slice(&word[..*size])),
        other => Err(decode_error(format!(
            "value of type {:?} is not numeric",
            other.sol_type_name()
        ))),
    }
}
