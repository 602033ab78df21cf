//! App - アプリケーション層
//!
//! このモジュールは、store の状態機械と ports を組み合わせて
//! プロジェクト一覧画面の振る舞いを実装します。
//!
//! # 主要コンポーネント
//! - **ViewModelBuilder**: 依存の注入と起動時検証
//! - **ProjectListViewModel**: 描画層が呼び出す操作の入口
//! - **ViewState**: 描画層が観測する状態

pub mod builder;
pub mod state;
pub mod view_model;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, ViewModelBuilder};
pub use self::state::ViewState;
pub use self::view_model::{CommitOutcome, DeleteOutcome, LoadOutcome, ProjectListViewModel};
