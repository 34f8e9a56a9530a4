//! Centralized names and limits for the source generator.
//!
//! Keeping these in one place stops the analysis pass, the model and the
//! tests from drifting apart on the exact spelling of generated names.

// =============================================================================
// Generated Names
// =============================================================================

/// Base name of a synthesized block-method that produces no value.
///
/// ```csharp
/// private void DoAction() { Console.WriteLine("hi"); Console.WriteLine("there"); }
/// ```
pub const ACTION_METHOD_NAME: &str = "DoAction";

/// Prefix of a synthesized block-method that produces a value. The return
/// type's name in PascalCase is appended: `GetInt32`, `GetStringList`.
pub const GETTER_METHOD_PREFIX: &str = "Get";

/// Type name given to the single type built from a raw block of lambdas.
pub const DEFAULT_TYPE_NAME: &str = "GeneratedExpressionClass";

/// Namespace used by placeholder types that stand in for open generic
/// parameters (`T` in `List<T>`). Never written as a `using` directive.
pub const GENERIC_PLACEHOLDER_NAMESPACE: &str = "Sharpgen.GenericPlaceholders";

/// Root namespace sorted ahead of every other namespace in `using` lists.
pub const SYSTEM_NAMESPACE: &str = "System";

// =============================================================================
// Capacity Hints
// =============================================================================

/// Declared variables stored inline per scope before spilling to the heap.
/// Most blocks and lambdas declare only a handful.
pub const SCOPE_INLINE_VARIABLES: usize = 8;

/// Initial capacity of the ancestor stack kept by the tree rewriter.
pub const ANCESTOR_STACK_CAPACITY: usize = 32;

// =============================================================================
// Recursion Limits
// =============================================================================

/// Deepest type nesting followed when checking whether a method type
/// argument appears in a parameter type (`Func<List<T[]>>`).
pub const MAX_TYPE_NESTING_DEPTH: u32 = 32;
