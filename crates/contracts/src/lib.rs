//! Общие типы каталога: агрегаты, перечисления и DTO use case'ов.
//!
//! Крейт не содержит логики ввода-вывода и используется backend'ом
//! как единый источник форматов JSON.

pub mod domain;
pub mod enums;
pub mod shared;
pub mod usecases;
