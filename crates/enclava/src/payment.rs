use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use serde::{Deserialize, Serialize};

use crate::units::{amount_to_units, scale_units};
use crate::{DatasetNFT, PaymentError, AMOUNT_DECIMALS, PAY_FUNCTION, VALUE_DECIMALS};

/// A buyer's selection: dataset token ids and the HBAR price of each,
/// index-aligned (`token_ids[i]` costs `amounts[i]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    pub token_ids: Vec<u64>,
    /// Amounts in HBAR.
    pub amounts: Vec<f64>,
}

impl PaymentData {
    pub fn new(token_ids: Vec<u64>, amounts: Vec<f64>) -> Self {
        Self { token_ids, amounts }
    }

    /// Length and emptiness checks. Runs before any conversion.
    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.token_ids.len() != self.amounts.len() {
            return Err(PaymentError::InvalidRequest(format!(
                "token ids and amounts must have the same length ({} vs {})",
                self.token_ids.len(),
                self.amounts.len()
            )));
        }
        if self.token_ids.is_empty() {
            return Err(PaymentError::EmptyRequest);
        }
        Ok(())
    }
}

/// A fully composed `payForMultipleDatasets` call, ready for a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCall {
    pub contract: Address,
    pub function_name: String,
    pub token_ids: Vec<U256>,
    /// Per-dataset amounts in tinybars.
    pub amounts: Vec<U256>,
    /// Attached native value in weibars.
    pub value: U256,
}

impl ContractCall {
    /// ABI-encoded calldata (selector + arguments).
    pub fn calldata(&self) -> Bytes {
        DatasetNFT::payForMultipleDatasetsCall {
            tokenIds: self.token_ids.clone(),
            amounts: self.amounts.clone(),
        }
        .abi_encode()
        .into()
    }

    /// Sum of the per-dataset amounts, in tinybars.
    pub fn total_units(&self) -> U256 {
        self.amounts.iter().fold(U256::ZERO, |acc, a| acc.saturating_add(*a))
    }
}

/// Validate a selection and compose the contract call for it.
///
/// Each amount becomes `round(amount * 10^8)` tinybars. The attached value is
/// the tinybar total lifted by another 10 digits, which is how the JSON-RPC
/// relay expects native value (weibars).
pub fn assemble(contract: Address, data: &PaymentData) -> Result<ContractCall, PaymentError> {
    data.validate()?;

    let amounts = data
        .amounts
        .iter()
        .map(|amount| amount_to_units(*amount, AMOUNT_DECIMALS))
        .collect::<Result<Vec<_>, _>>()?;

    let total = amounts.iter().try_fold(U256::ZERO, |acc, a| {
        acc.checked_add(*a)
            .ok_or_else(|| PaymentError::Overflow("total payment exceeds uint256".to_string()))
    })?;

    let value = scale_units(total, VALUE_DECIMALS)?;

    Ok(ContractCall {
        contract,
        function_name: PAY_FUNCTION.to_string(),
        token_ids: data.token_ids.iter().map(|id| U256::from(*id)).collect(),
        amounts,
        value,
    })
}
