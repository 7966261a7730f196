//! Method selector inputs: raw 4-byte values, signature strings or ABI function items.

use alloy_json_abi::{Function, Param, StateMutability};
use alloy_primitives::FixedBytes;
use serde::{Deserialize, Deserializer};

use super::json;
use crate::errors::{DelegationError, Result};

/// Any of the accepted ways to name a method.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MethodSelector {
    Selector(FixedBytes<4>),
    /// `0x`-prefixed 4-byte hex or a signature such as `function transfer(address to, uint256)`.
    Text(String),
    /// A JSON ABI function item: `{"type": "function", "name": ..., "inputs": [...]}`.
    Function(#[serde(deserialize_with = "abi_function")] Function),
}

impl MethodSelector {
    pub fn resolve(&self) -> Result<FixedBytes<4>> {
        match self {
            MethodSelector::Selector(selector) => Ok(*selector),
            MethodSelector::Text(text) => {
                if text.starts_with("0x") || text.starts_with("0X") {
                    if text.len() != 10 {
                        return Err(DelegationError::InvalidSelector);
                    }
                    let raw = hex::decode(&text[2..]).map_err(|_| DelegationError::InvalidSelector)?;
                    return Ok(FixedBytes::from_slice(&raw));
                }
                let function = Function::parse(text.trim()).map_err(|_| DelegationError::InvalidSelector)?;
                Ok(function.selector())
            }
            // Round-trip through the parser so the name and every input type are checked.
            MethodSelector::Function(function) => Function::parse(&function.signature())
                .map(|parsed| parsed.selector())
                .map_err(|_| DelegationError::InvalidSelector),
        }
    }
}

impl From<FixedBytes<4>> for MethodSelector {
    fn from(selector: FixedBytes<4>) -> Self {
        MethodSelector::Selector(selector)
    }
}

impl From<&str> for MethodSelector {
    fn from(text: &str) -> Self {
        MethodSelector::Text(text.to_owned())
    }
}

impl From<Function> for MethodSelector {
    fn from(function: Function) -> Self {
        MethodSelector::Function(function)
    }
}

#[derive(Deserialize)]
struct AbiParamJson {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    components: Vec<AbiParamJson>,
}

impl From<AbiParamJson> for Param {
    fn from(param: AbiParamJson) -> Self {
        Param {
            ty: param.ty,
            name: param.name,
            components: param.components.into_iter().map(Param::from).collect(),
            internal_type: None,
        }
    }
}

#[derive(Deserialize)]
struct AbiFunctionJson {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParamJson>,
}

// Only name and inputs feed the selector; outputs and mutability are ignored.
fn abi_function<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Function, D::Error> {
    let item = AbiFunctionJson::deserialize(deserializer)?;
    if item.kind.as_deref().is_some_and(|kind| kind != "function") {
        return Err(json::reject(DelegationError::InvalidSelector));
    }
    Ok(Function {
        name: item.name,
        inputs: item.inputs.into_iter().map(Param::from).collect(),
        outputs: Vec::new(),
        state_mutability: StateMutability::NonPayable,
    })
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{fixed_bytes, keccak256};
    use serde_json::json;

    use super::*;

    const TRANSFER: FixedBytes<4> = fixed_bytes!("a9059cbb");

    fn transfer_item() -> serde_json::Value {
        json!({
            "type": "function",
            "name": "transfer",
            "inputs": [
                { "name": "to", "type": "address" },
                { "name": "amount", "type": "uint256" }
            ],
            "outputs": [{ "name": "", "type": "bool" }],
            "stateMutability": "nonpayable"
        })
    }

    #[test]
    fn test_selector_forms_agree() {
        let forms = [
            MethodSelector::from("0xa9059cbb"),
            MethodSelector::from("transfer(address,uint256)"),
            MethodSelector::from("function transfer(address to, uint256 amount) external returns (bool)"),
            MethodSelector::from(TRANSFER),
            json::from_value::<MethodSelector>(transfer_item()).unwrap(),
        ];
        for form in forms {
            assert_eq!(form.resolve().unwrap(), TRANSFER, "{form:?}");
        }
        assert_eq!(
            MethodSelector::from("balanceOf(address)").resolve().unwrap(),
            fixed_bytes!("70a08231")
        );
    }

    #[test]
    fn test_abi_item_needs_only_name_and_inputs() {
        let bare = json!({
            "type": "function",
            "name": "transfer",
            "inputs": [{ "name": "to", "type": "address" }, { "name": "amount", "type": "uint256" }]
        });
        let selector = json::from_value::<MethodSelector>(bare).unwrap();
        assert!(matches!(selector, MethodSelector::Function(_)));
        assert_eq!(selector.resolve().unwrap(), TRANSFER);

        let event = json!({ "type": "event", "name": "Transfer", "inputs": [] });
        assert!(matches!(
            json::from_value::<MethodSelector>(event),
            Err(DelegationError::InvalidSelector)
        ));
    }

    #[test]
    fn test_invalid_selectors() {
        let bad_text = [
            "0x1234",
            "0xa9059cbb00",
            "0xzzzzzzzz",
            "",
            "transfer",
            "transfer(address",
            "transfer(address)garbage",
        ];
        for bad in bad_text {
            assert!(
                matches!(MethodSelector::from(bad).resolve(), Err(DelegationError::InvalidSelector)),
                "{bad:?} should be rejected"
            );
        }
        let bad_type = json!({ "type": "function", "name": "transfer", "inputs": [{ "name": "to", "type": "uint256]" }] });
        let selector = json::from_value::<MethodSelector>(bad_type).unwrap();
        assert!(matches!(selector.resolve(), Err(DelegationError::InvalidSelector)));
    }

    #[test]
    fn test_tuple_params_are_flattened() {
        let expected = FixedBytes::<4>::from_slice(&keccak256("execute((address,uint256,bytes)[])")[..4]);
        let text = MethodSelector::from("execute((address target, uint256 value, bytes callData)[] calls)");
        assert_eq!(text.resolve().unwrap(), expected);

        let item = json!({
            "type": "function",
            "name": "execute",
            "inputs": [{
                "name": "calls",
                "type": "tuple[]",
                "components": [
                    { "name": "target", "type": "address" },
                    { "name": "value", "type": "uint256" },
                    { "name": "callData", "type": "bytes" }
                ]
            }]
        });
        assert_eq!(json::from_value::<MethodSelector>(item).unwrap().resolve().unwrap(), expected);
    }
}
