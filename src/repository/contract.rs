use alloy::sol;

// Smart contract ABI definitions for the swap router and the contracts it reads through
sol! {
    /// Swap router with on-chain path discovery.
    ///
    /// `findBestPath` walks the router's adapters and returns the best offer it can find for
    /// the given amount. The three `swapNoSplit*` entry points execute a previously quoted
    /// offer along a single path.
    interface ISwapRouter {
        /// Best offer returned by path discovery.
        ///
        /// `amounts` and `path` have the same length; `amounts[last]` is the output amount.
        /// `adapters` holds one adapter per hop.
        struct FormattedOffer {
            uint256[] amounts;
            address[] adapters;
            address[] path;
            uint256 gasEstimate;
        }

        /// A single-path trade as accepted by the `swapNoSplit*` entry points.
        struct Trade {
            uint256 amountIn;
            uint256 amountOut;
            address[] path;
            address[] adapters;
        }

        /// Finds the best path from `_tokenIn` to `_tokenOut` using at most `_maxSteps` hops.
        ///
        /// Both token arguments must be ERC20 contracts; the router does not understand the
        /// native currency sentinel here.
        function findBestPath(
            uint256 _amountIn,
            address _tokenIn,
            address _tokenOut,
            uint256 _maxSteps
        ) external view returns (FormattedOffer memory);

        /// Swaps ERC20 for ERC20 along `_trade.path`.
        function swapNoSplit(Trade calldata _trade, address _to, uint256 _fee) external;

        /// Swaps native currency (sent as msg.value) for an ERC20.
        function swapNoSplitFromNative(Trade calldata _trade, address _to, uint256 _fee) external payable;

        /// Swaps an ERC20 for native currency.
        function swapNoSplitToNative(Trade calldata _trade, address _to, uint256 _fee) external;
    }

    /// ERC20 token standard interface with the EIP-2612 permit extension.
    ///
    /// Only the functions the swap pipeline reads or encodes are declared.
    interface IERC20 {
        /// Returns the token balance of the specified account.
        function balanceOf(address account) external view returns (uint256);

        /// Returns the remaining amount `spender` may transfer on behalf of `owner`.
        function allowance(address owner, address spender) external view returns (uint256);

        /// Grants `spender` an allowance of `amount`.
        function approve(address spender, uint256 amount) external returns (bool);

        /// Grants an allowance from a signed EIP-2612 message.
        function permit(
            address owner,
            address spender,
            uint256 value,
            uint256 deadline,
            uint8 v,
            bytes32 r,
            bytes32 s
        ) external;
    }

    /// Multicall3 batching contract, deployed at the same address on most EVM chains.
    #[sol(rpc)]
    interface IMulticall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct Call3Result {
            bool success;
            bytes returnData;
        }

        /// Executes every call and reports per-call success when `allowFailure` is set.
        function aggregate3(Call3[] calldata calls) external payable returns (Call3Result[] memory returnData);
    }
}
