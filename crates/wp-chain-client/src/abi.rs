//! Solidity bindings for the WavePortal contract.

use alloy_sol_types::sol;

/// Rinkeby deployment the portal talks to unless configured otherwise.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x7647cA26cEd7450b7d01007f7F8607C81394cB6D";

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct Wave {
        address waver;
        string message;
        uint256 timestamp;
    }

    function wave(string _message) external;
    function getWaves() external view returns (Wave[] memory waves);
    function getTotalWaves() external view returns (uint256 total);
}
