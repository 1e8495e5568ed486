//! Initial database migration.
//!
//! Creates all enums, tables, indexes, and triggers for the Kakebo schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CATALOG TABLES
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(PEOPLE_SQL).await?;
        db.execute_unprepared(CATEGORIES_SQL).await?;
        db.execute_unprepared(SHOPS_SQL).await?;
        db.execute_unprepared(SUBSCRIPTIONS_SQL).await?;

        // ============================================================
        // PART 3: TRANSACTIONS
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: CASHBACK LEDGER
        // ============================================================
        db.execute_unprepared(CASHBACK_MOVEMENTS_SQL).await?;
        db.execute_unprepared(CASHBACK_LEDGERS_SQL).await?;

        // ============================================================
        // PART 5: DEBT LEDGER
        // ============================================================
        db.execute_unprepared(DEBT_MOVEMENTS_SQL).await?;
        db.execute_unprepared(DEBT_LEDGERS_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Account kinds
CREATE TYPE account_kind AS ENUM (
    'cash',
    'bank',
    'credit_card',
    'ewallet'
);

-- Category direction
CREATE TYPE category_direction AS ENUM ('expense', 'income');

-- Transaction kinds
CREATE TYPE transaction_kind AS ENUM (
    'expense',
    'income',
    'debt',
    'repayment',
    'cashback',
    'subscription',
    'import',
    'adjustment'
);

-- Transaction statuses
CREATE TYPE transaction_status AS ENUM (
    'active',
    'pending',
    'void',
    'canceled'
);

-- Cashback reward kinds
CREATE TYPE cashback_kind AS ENUM ('percent', 'fixed');

-- Cashback movement statuses (applied -> invalidated only)
CREATE TYPE cashback_movement_status AS ENUM ('applied', 'invalidated');

-- Cashback eligibility
CREATE TYPE cashback_eligibility AS ENUM (
    'eligible',
    'not_eligible',
    'reached_cap',
    'pending'
);

-- Cashback ledger statuses
CREATE TYPE cashback_ledger_status AS ENUM ('open', 'closed');

-- Debt movement kinds
CREATE TYPE debt_movement_kind AS ENUM (
    'borrow',
    'repay',
    'adjust',
    'discount',
    'split'
);

-- Debt movement statuses (settled and reversed are terminal)
CREATE TYPE debt_movement_status AS ENUM ('active', 'settled', 'reversed');

-- Debt ledger statuses
CREATE TYPE debt_ledger_status AS ENUM ('open', 'partial', 'repaid', 'overdue');
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    kind account_kind NOT NULL,
    currency TEXT NOT NULL DEFAULT 'USD',
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PEOPLE_SQL: &str = r"
CREATE TABLE people (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    note TEXT,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    direction category_direction NOT NULL,
    parent_id UUID REFERENCES categories(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const SHOPS_SQL: &str = r"
CREATE TABLE shops (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const SUBSCRIPTIONS_SQL: &str = r"
CREATE TABLE subscriptions (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    amount NUMERIC(14, 2) NOT NULL,
    billing_day SMALLINT NOT NULL CHECK (billing_day BETWEEN 1 AND 31),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id),
    person_id UUID REFERENCES people(id),
    category_id UUID REFERENCES categories(id),
    shop_id UUID REFERENCES shops(id),
    subscription_id UUID REFERENCES subscriptions(id),
    linked_group_id UUID,
    kind transaction_kind NOT NULL,
    status transaction_status NOT NULL DEFAULT 'active',
    amount NUMERIC(14, 2) NOT NULL,
    fee NUMERIC(14, 2),
    occurred_on DATE NOT NULL,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_transactions_account ON transactions(account_id);
CREATE INDEX idx_transactions_person ON transactions(person_id)
    WHERE person_id IS NOT NULL;
CREATE INDEX idx_transactions_occurred_on ON transactions(occurred_on);
CREATE INDEX idx_transactions_linked_group ON transactions(linked_group_id)
    WHERE linked_group_id IS NOT NULL;
";

const CASHBACK_MOVEMENTS_SQL: &str = r"
-- transaction_id carries no foreign key: an invalidated movement outlives
-- its transaction as audit history.
CREATE TABLE cashback_movements (
    id UUID PRIMARY KEY,
    transaction_id UUID NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    cycle_tag TEXT NOT NULL,
    cashback_kind cashback_kind NOT NULL,
    cashback_value NUMERIC(9, 4) NOT NULL,
    cashback_amount NUMERIC(14, 2) NOT NULL,
    status cashback_movement_status NOT NULL DEFAULT 'applied',
    budget_cap NUMERIC(14, 2) NOT NULL DEFAULT 0,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_cashback_movements_transaction ON cashback_movements(transaction_id);
CREATE INDEX idx_cashback_movements_key ON cashback_movements(account_id, cycle_tag);
";

const CASHBACK_LEDGERS_SQL: &str = r"
CREATE TABLE cashback_ledgers (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id),
    cycle_tag TEXT NOT NULL,
    total_spend NUMERIC(14, 2) NOT NULL DEFAULT 0,
    total_cashback NUMERIC(14, 2) NOT NULL DEFAULT 0,
    budget_cap NUMERIC(14, 2) NOT NULL DEFAULT 0,
    eligibility cashback_eligibility NOT NULL DEFAULT 'pending',
    remaining_budget NUMERIC(14, 2) NOT NULL DEFAULT 0,
    status cashback_ledger_status NOT NULL DEFAULT 'open',
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- At most one ledger row per (account, cycle)
    CONSTRAINT uq_cashback_ledgers_key UNIQUE (account_id, cycle_tag)
);
";

const DEBT_MOVEMENTS_SQL: &str = r"
-- transaction_id carries no foreign key: a reversed movement outlives its
-- transaction as audit history.
CREATE TABLE debt_movements (
    id UUID PRIMARY KEY,
    transaction_id UUID NOT NULL,
    person_id UUID NOT NULL REFERENCES people(id),
    account_id UUID NOT NULL REFERENCES accounts(id),
    movement_kind debt_movement_kind NOT NULL,
    amount NUMERIC(14, 2) NOT NULL CHECK (amount >= 0),
    cycle_tag TEXT,
    status debt_movement_status NOT NULL DEFAULT 'active',
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_debt_movements_transaction ON debt_movements(transaction_id);
CREATE INDEX idx_debt_movements_person ON debt_movements(person_id, cycle_tag);
";

const DEBT_LEDGERS_SQL: &str = r"
CREATE TABLE debt_ledgers (
    id UUID PRIMARY KEY,
    person_id UUID NOT NULL REFERENCES people(id),
    cycle_tag TEXT,
    initial_debt NUMERIC(14, 2) NOT NULL DEFAULT 0,
    new_debt NUMERIC(14, 2) NOT NULL DEFAULT 0,
    repayments NUMERIC(14, 2) NOT NULL DEFAULT 0,
    debt_discount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    net_debt NUMERIC(14, 2) NOT NULL DEFAULT 0,
    status debt_ledger_status NOT NULL DEFAULT 'open',
    notes TEXT,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- At most one ledger row per (person, cycle). COALESCE folds all NULL
-- cycle tags into a single group, so a person gets exactly one rolling
-- ledger.
CREATE UNIQUE INDEX uq_debt_ledgers_key
    ON debt_ledgers (person_id, COALESCE(cycle_tag, ''));
";

const TRIGGERS_SQL: &str = r"
-- Keep updated_at current on every row update
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_accounts_updated_at
    BEFORE UPDATE ON accounts
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_people_updated_at
    BEFORE UPDATE ON people
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_categories_updated_at
    BEFORE UPDATE ON categories
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_shops_updated_at
    BEFORE UPDATE ON shops
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_subscriptions_updated_at
    BEFORE UPDATE ON subscriptions
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_transactions_updated_at
    BEFORE UPDATE ON transactions
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_cashback_movements_updated_at
    BEFORE UPDATE ON cashback_movements
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_debt_movements_updated_at
    BEFORE UPDATE ON debt_movements
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS debt_ledgers CASCADE;
DROP TABLE IF EXISTS debt_movements CASCADE;
DROP TABLE IF EXISTS cashback_ledgers CASCADE;
DROP TABLE IF EXISTS cashback_movements CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS subscriptions CASCADE;
DROP TABLE IF EXISTS shops CASCADE;
DROP TABLE IF EXISTS categories CASCADE;
DROP TABLE IF EXISTS people CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;

DROP FUNCTION IF EXISTS set_updated_at CASCADE;

DROP TYPE IF EXISTS debt_ledger_status;
DROP TYPE IF EXISTS debt_movement_status;
DROP TYPE IF EXISTS debt_movement_kind;
DROP TYPE IF EXISTS cashback_ledger_status;
DROP TYPE IF EXISTS cashback_eligibility;
DROP TYPE IF EXISTS cashback_movement_status;
DROP TYPE IF EXISTS cashback_kind;
DROP TYPE IF EXISTS transaction_status;
DROP TYPE IF EXISTS transaction_kind;
DROP TYPE IF EXISTS category_direction;
DROP TYPE IF EXISTS account_kind;
";
