use rust_decimal::Decimal;
use shared::{BankAccount as BankAccountDto, CreateAccountRequest, UpdateAccountRequest};

use crate::domain::commands::account::{CreateAccountCommand, UpdateAccountCommand};
use crate::domain::models::account::BankAccount;

pub struct AccountMapper;

impl AccountMapper {
    pub fn to_dto(domain: BankAccount) -> BankAccountDto {
        BankAccountDto {
            id: domain.id,
            owner: domain.owner,
            name: domain.name,
            bank: domain.bank,
            currency: domain.currency,
            country: domain.country,
            balance: domain.balance,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_dto_list(accounts: Vec<BankAccount>) -> Vec<BankAccountDto> {
        accounts.into_iter().map(Self::to_dto).collect()
    }

    /// A missing opening balance starts the account at zero
    pub fn to_create_command(request: CreateAccountRequest) -> CreateAccountCommand {
        CreateAccountCommand {
            name: request.name,
            bank: request.bank,
            currency: request.currency,
            country: request.country,
            balance: request.balance.unwrap_or(Decimal::ZERO),
        }
    }

    pub fn to_update_command(request: UpdateAccountRequest) -> UpdateAccountCommand {
        UpdateAccountCommand {
            name: request.name,
            bank: request.bank,
            currency: request.currency,
            country: request.country,
            balance: request.balance,
        }
    }
}
