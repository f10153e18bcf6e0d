//! Contract bindings
//!
//! ABI definitions for ERC20 tokens and the VinuHub locker, plus small typed
//! wrappers that route calls through a [`ChainClient`].

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{sol, SolCall};

use crate::client::{ChainClient, TxReceipt};
use crate::Result;

sol! {
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    interface ILocker {
        struct Lock {
            uint256 id;
            address token;
            address beneficiary;
            uint256 amount;
            uint256 startTime;
            uint256 cliffDuration;
            uint256 vestingDuration;
            uint256 released;
            bool revoked;
        }

        event LockCreated(
            uint256 indexed id,
            address indexed beneficiary,
            address token,
            uint256 amount,
            uint256 startTime,
            uint256 cliffDuration,
            uint256 vestingDuration
        );
        event TokensReleased(uint256 indexed id, address indexed beneficiary, address token, uint256 amount);
        event LockTransferred(uint256 indexed id, address indexed oldBeneficiary, address indexed newBeneficiary);

        function totalLocked() external view returns (uint256);
        function uniqueTokens() external view returns (uint256);
        function activeLocks() external view returns (uint256);
        function totalValueUSD() external view returns (uint256);
        function getLocksForUser(address user) external view returns (Lock[] memory);
        function releasableAmount(uint256 id) external view returns (uint256);
        function owner() external view returns (address);
        function paused() external view returns (bool);

        function createLock(
            address token,
            uint256 amount,
            uint256 startTime,
            uint256 cliffDuration,
            uint256 vestingDuration,
            address beneficiary
        ) external returns (uint256);
        function release(uint256 id) external;
        function transferLock(uint256 id, address newBeneficiary) external;
        function batchRelease(uint256[] ids) external;
        function batchTransfer(uint256[] ids, address newBeneficiary) external;
        function setTokenPrice(address token, uint256 price) external;
    }
}

/// Snapshot of a lock as stored by the locker contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRecord {
    pub id: U256,
    pub token: Address,
    pub beneficiary: Address,
    pub amount: U256,
    /// Unix seconds
    pub start_time: u64,
    /// Seconds
    pub cliff_duration: u64,
    /// Seconds
    pub vesting_duration: u64,
    pub released: U256,
    pub revoked: bool,
}

impl LockRecord {
    /// Not revoked and not yet fully released
    pub fn is_active(&self) -> bool {
        !self.revoked && self.released < self.amount
    }

    /// Not revoked and fully released
    pub fn is_fully_vested(&self) -> bool {
        !self.revoked && self.released >= self.amount
    }
}

impl From<ILocker::Lock> for LockRecord {
    fn from(lock: ILocker::Lock) -> Self {
        Self {
            id: lock.id,
            token: lock.token,
            beneficiary: lock.beneficiary,
            amount: lock.amount,
            start_time: saturating_u64(lock.startTime),
            cliff_duration: saturating_u64(lock.cliffDuration),
            vesting_duration: saturating_u64(lock.vestingDuration),
            released: lock.released,
            revoked: lock.revoked,
        }
    }
}

fn saturating_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Parameters of a `createLock` call, durations already in seconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLockParams {
    pub token: Address,
    pub amount: U256,
    pub start_time: u64,
    pub cliff_seconds: U256,
    pub vesting_seconds: U256,
    pub beneficiary: Address,
}

impl CreateLockParams {
    pub fn to_call(&self) -> ILocker::createLockCall {
        ILocker::createLockCall {
            token: self.token,
            amount: self.amount,
            startTime: U256::from(self.start_time),
            cliffDuration: self.cliff_seconds,
            vestingDuration: self.vesting_seconds,
            beneficiary: self.beneficiary,
        }
    }
}

// ============================================================================
// ERC20
// ============================================================================

pub struct Erc20<'a> {
    client: &'a ChainClient,
    address: Address,
}

impl<'a> Erc20<'a> {
    pub fn new(client: &'a ChainClient, address: Address) -> Self {
        Self { client, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn name(&self) -> Result<String> {
        Ok(self.client.call(self.address, &IERC20::nameCall {}).await?._0)
    }

    pub async fn symbol(&self) -> Result<String> {
        Ok(self.client.call(self.address, &IERC20::symbolCall {}).await?._0)
    }

    pub async fn decimals(&self) -> Result<u8> {
        Ok(self.client.call(self.address, &IERC20::decimalsCall {}).await?._0)
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        let call = IERC20::balanceOfCall { account };
        Ok(self.client.call(self.address, &call).await?._0)
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        let call = IERC20::allowanceCall { owner, spender };
        Ok(self.client.call(self.address, &call).await?._0)
    }

    pub async fn approve(&self, from: Address, spender: Address, amount: U256) -> Result<TxReceipt> {
        let call = IERC20::approveCall { spender, amount };
        self.client.send_and_confirm(from, self.address, &call).await
    }
}

// ============================================================================
// Locker
// ============================================================================

pub struct Locker<'a> {
    client: &'a ChainClient,
    address: Address,
}

impl<'a> Locker<'a> {
    pub fn new(client: &'a ChainClient, address: Address) -> Self {
        Self { client, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn total_locked(&self) -> Result<U256> {
        Ok(self.client.call(self.address, &ILocker::totalLockedCall {}).await?._0)
    }

    pub async fn unique_tokens(&self) -> Result<U256> {
        Ok(self.client.call(self.address, &ILocker::uniqueTokensCall {}).await?._0)
    }

    pub async fn active_locks(&self) -> Result<U256> {
        Ok(self.client.call(self.address, &ILocker::activeLocksCall {}).await?._0)
    }

    pub async fn total_value_usd(&self) -> Result<U256> {
        Ok(self.client.call(self.address, &ILocker::totalValueUSDCall {}).await?._0)
    }

    pub async fn locks_for_user(&self, user: Address) -> Result<Vec<LockRecord>> {
        let call = ILocker::getLocksForUserCall { user };
        let locks = self.client.call(self.address, &call).await?._0;
        Ok(locks.into_iter().map(LockRecord::from).collect())
    }

    pub async fn releasable_amount(&self, id: U256) -> Result<U256> {
        let call = ILocker::releasableAmountCall { id };
        Ok(self.client.call(self.address, &call).await?._0)
    }

    pub async fn owner(&self) -> Result<Address> {
        Ok(self.client.call(self.address, &ILocker::ownerCall {}).await?._0)
    }

    pub async fn paused(&self) -> Result<bool> {
        Ok(self.client.call(self.address, &ILocker::pausedCall {}).await?._0)
    }

    /// Estimated fee text for any locker write
    pub async fn estimate_fee<C: SolCall>(&self, from: Address, call: &C) -> Result<String> {
        self.client.estimate_fee(from, self.address, call).await
    }

    /// Submit a locker write and wait for it to be mined
    pub async fn execute<C: SolCall>(&self, from: Address, call: &C) -> Result<TxReceipt> {
        self.client.send_and_confirm(from, self.address, call).await
    }

    pub async fn create_lock(&self, from: Address, params: &CreateLockParams) -> Result<TxReceipt> {
        self.execute(from, &params.to_call()).await
    }

    pub async fn release(&self, from: Address, id: U256) -> Result<TxReceipt> {
        self.execute(from, &ILocker::releaseCall { id }).await
    }

    pub async fn transfer_lock(&self, from: Address, id: U256, new_beneficiary: Address) -> Result<TxReceipt> {
        let call = ILocker::transferLockCall {
            id,
            newBeneficiary: new_beneficiary,
        };
        self.execute(from, &call).await
    }

    pub async fn batch_release(&self, from: Address, ids: Vec<U256>) -> Result<TxReceipt> {
        self.execute(from, &ILocker::batchReleaseCall { ids }).await
    }

    pub async fn batch_transfer(&self, from: Address, ids: Vec<U256>, new_beneficiary: Address) -> Result<TxReceipt> {
        let call = ILocker::batchTransferCall {
            ids,
            newBeneficiary: new_beneficiary,
        };
        self.execute(from, &call).await
    }

    pub async fn set_token_price(&self, from: Address, token: Address, price: U256) -> Result<TxReceipt> {
        self.execute(from, &ILocker::setTokenPriceCall { token, price }).await
    }
}

/// Left-pad an address into an indexed event topic
pub fn address_topic(address: Address) -> B256 {
    address.into_word()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolEvent;

    #[test]
    fn test_known_selectors() {
        // keccak256("approve(address,uint256)")[..4]
        assert_eq!(IERC20::approveCall::SELECTOR, [0x09, 0x5e, 0xa7, 0xb3]);
        // keccak256("balanceOf(address)")[..4]
        assert_eq!(IERC20::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
        // keccak256("owner()")[..4]
        assert_eq!(ILocker::ownerCall::SELECTOR, [0x8d, 0xa5, 0xcb, 0x5b]);
    }

    #[test]
    fn test_event_signatures() {
        assert_eq!(
            ILocker::LockTransferred::SIGNATURE,
            "LockTransferred(uint256,address,address)"
        );
        assert_eq!(
            ILocker::LockCreated::SIGNATURE,
            "LockCreated(uint256,address,address,uint256,uint256,uint256,uint256)"
        );
    }

    #[test]
    fn test_create_lock_params_to_call() {
        let params = CreateLockParams {
            token: Address::repeat_byte(0xab),
            amount: U256::from(1000u64),
            start_time: 1_700_000_000,
            cliff_seconds: U256::from(10 * 86_400u64),
            vesting_seconds: U256::from(30 * 86_400u64),
            beneficiary: Address::repeat_byte(0x12),
        };
        let call = params.to_call();
        assert_eq!(call.cliffDuration, U256::from(864_000u64));
        assert_eq!(call.vestingDuration, U256::from(2_592_000u64));
        assert_eq!(call.abi_encode().len(), 4 + 6 * 32);
    }

    #[test]
    fn test_lock_classification() {
        let mut lock = LockRecord {
            id: U256::from(1u64),
            token: Address::ZERO,
            beneficiary: Address::ZERO,
            amount: U256::from(100u64),
            start_time: 0,
            cliff_duration: 0,
            vesting_duration: 0,
            released: U256::from(40u64),
            revoked: false,
        };
        assert!(lock.is_active());
        assert!(!lock.is_fully_vested());

        lock.released = U256::from(100u64);
        assert!(!lock.is_active());
        assert!(lock.is_fully_vested());

        lock.revoked = true;
        assert!(!lock.is_active());
        assert!(!lock.is_fully_vested());
    }

    #[test]
    fn test_address_topic_is_left_padded() {
        let address = Address::repeat_byte(0x77);
        let topic = address_topic(address);
        assert_eq!(&topic[..12], &[0u8; 12]);
        assert_eq!(&topic[12..], address.as_slice());
    }
}
