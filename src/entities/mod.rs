//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! The ownership chain is user -> expense head -> category -> subcategory, with
//! expenses pointing at both a subcategory and a user.

pub mod category;
pub mod expense;
pub mod expense_head;
pub mod sub_category;
pub mod user;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use expense_head::{
    Column as ExpenseHeadColumn, Entity as ExpenseHead, Model as ExpenseHeadModel,
};
pub use sub_category::{
    Column as SubCategoryColumn, Entity as SubCategory, Model as SubCategoryModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
