//! Function signatures and their ABI encoding.
//!
//! A signature such as `supply(address,uint256,address,uint16)` is parsed
//! once into its canonical form, parameter types and four-byte selector.
//! Argument shapes are checked against the declared types before encoding.

use super::EncodingError;
use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{hex, keccak256, Bytes};

/// A parsed Solidity function signature.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
	name: String,
	inputs: Vec<DynSolType>,
	selector: [u8; 4],
}

impl FunctionSignature {
	/// Parses `name(type,...)`. Whitespace is ignored and type aliases such
	/// as `uint` are normalized before the selector is derived.
	pub fn parse(signature: &str) -> Result<Self, EncodingError> {
		let compact: String = signature.chars().filter(|c| !c.is_whitespace()).collect();

		let open = compact
			.find('(')
			.ok_or_else(|| EncodingError::InvalidSignature(signature.to_string()))?;
		if !compact.ends_with(')') {
			return Err(EncodingError::InvalidSignature(signature.to_string()));
		}

		let name = &compact[..open];
		let valid_name = name
			.chars()
			.next()
			.is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
			&& name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
		if !valid_name {
			return Err(EncodingError::InvalidSignature(signature.to_string()));
		}

		let params = DynSolType::parse(&compact[open..]).map_err(|e| {
			EncodingError::InvalidSignature(format!("{}: {}", signature, e))
		})?;
		let inputs = match params {
			DynSolType::Tuple(types) => types,
			single => vec![single],
		};

		let mut sig = Self {
			name: name.to_string(),
			inputs,
			selector: [0u8; 4],
		};
		let hash = keccak256(sig.canonical().as_bytes());
		sig.selector.copy_from_slice(&hash[..4]);
		Ok(sig)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn inputs(&self) -> &[DynSolType] {
		&self.inputs
	}

	pub fn selector(&self) -> [u8; 4] {
		self.selector
	}

	/// The signature with canonical type names and no whitespace.
	pub fn canonical(&self) -> String {
		let params: Vec<String> = self
			.inputs
			.iter()
			.map(|ty| ty.sol_type_name().to_string())
			.collect();
		format!("{}({})", self.name, params.join(","))
	}

	/// Encodes typed arguments as call data: selector then ABI parameters.
	pub fn encode(&self, args: &[DynSolValue]) -> Result<Bytes, EncodingError> {
		self.check_arity(args.len())?;

		for (index, (ty, value)) in self.inputs.iter().zip(args).enumerate() {
			if !ty.matches(value) {
				return Err(EncodingError::ArgumentType {
					index,
					expected: ty.sol_type_name().to_string(),
					detail: format!(
						"got {}",
						value
							.sol_type_name()
							.map(|name| name.to_string())
							.unwrap_or_else(|| "a value of unknown type".to_string())
					),
				});
			}
			if let DynSolValue::Uint(number, bits) = value {
				if number.bit_len() > *bits {
					return Err(EncodingError::ArgumentType {
						index,
						expected: ty.sol_type_name().to_string(),
						detail: format!("{} does not fit in {} bits", number, bits),
					});
				}
			}
		}

		let params = DynSolValue::Tuple(args.to_vec()).abi_encode_params();
		let mut data = Vec::with_capacity(4 + params.len());
		data.extend_from_slice(&self.selector);
		data.extend_from_slice(&params);
		Ok(Bytes::from(data))
	}

	/// Encodes textual arguments, coercing each to its declared type.
	pub fn encode_str(&self, args: &[&str]) -> Result<Bytes, EncodingError> {
		self.check_arity(args.len())?;

		let values = self
			.inputs
			.iter()
			.zip(args)
			.enumerate()
			.map(|(index, (ty, arg))| {
				ty.coerce_str(arg).map_err(|e| EncodingError::ArgumentType {
					index,
					expected: ty.sol_type_name().to_string(),
					detail: e.to_string(),
				})
			})
			.collect::<Result<Vec<_>, _>>()?;

		self.encode(&values)
	}

	/// Decodes call data produced by `encode` back into typed arguments.
	pub fn decode(&self, data: &[u8]) -> Result<Vec<DynSolValue>, EncodingError> {
		if data.len() < 4 {
			return Err(EncodingError::Decode(format!(
				"call data is {} bytes, shorter than a selector",
				data.len()
			)));
		}
		if data[..4] != self.selector {
			return Err(EncodingError::SelectorMismatch {
				expected: hex::encode_prefixed(self.selector),
				found: hex::encode_prefixed(&data[..4]),
			});
		}

		let decoded = DynSolType::Tuple(self.inputs.clone())
			.abi_decode_params(&data[4..])
			.map_err(|e| EncodingError::Decode(e.to_string()))?;

		match decoded {
			DynSolValue::Tuple(values) => Ok(values),
			single => Ok(vec![single]),
		}
	}

	fn check_arity(&self, got: usize) -> Result<(), EncodingError> {
		if got != self.inputs.len() {
			return Err(EncodingError::ArgumentCount {
				signature: self.canonical(),
				expected: self.inputs.len(),
				got,
			});
		}
		Ok(())
	}
}
