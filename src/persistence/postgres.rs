//! PostgreSQL implementation of the storage contract.
//!
//! All conditional writes are expressed as `UPDATE ... WHERE` guards
//! checked through `rows_affected`, and the two multi-record operations
//! (match commit, swap completion) run inside a single database
//! transaction so no partial state is ever observable.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use super::models::{AssignmentRow, SwapRequestRow};
use super::store::SwapStore;
use crate::domain::{ParkingAssignment, PartyRole, RequestId, SwapRequest};
use crate::error::SwapError;

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PgSwapStore {
    pool: PgPool,
}

impl PgSwapStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Creates or replaces one parking assignment inside an open transaction.
async fn upsert_assignment(
    conn: &mut PgConnection,
    phone: &str,
    block: &str,
    space1: i32,
    space2: i32,
) -> Result<(), SwapError> {
    sqlx::query(
        "INSERT INTO parking_assignments (phone_number, block_letter, space_number1, space_number2) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (phone_number) DO UPDATE SET \
             block_letter = EXCLUDED.block_letter, \
             space_number1 = EXCLUDED.space_number1, \
             space_number2 = EXCLUDED.space_number2",
    )
    .bind(phone)
    .bind(block)
    .bind(space1)
    .bind(space2)
    .execute(conn)
    .await?;
    Ok(())
}

#[async_trait]
impl SwapStore for PgSwapStore {
    async fn find_active_by_requester(
        &self,
        phone: &str,
    ) -> Result<Option<SwapRequest>, SwapError> {
        let row = sqlx::query_as::<_, SwapRequestRow>(
            "SELECT id, requester_phone, requester_block, requester_space1, requester_space2, \
                    desired_block, owner_phone, owner_block, owner_space1, owner_space2, \
                    requester_confirmed, owner_confirmed, status, created_at \
             FROM swap_requests WHERE requester_phone = $1 \
             ORDER BY created_at ASC LIMIT 1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SwapRequest::try_from).transpose()
    }

    async fn create_request(&self, request: &SwapRequest) -> Result<(), SwapError> {
        sqlx::query(
            "INSERT INTO swap_requests \
                 (id, requester_phone, requester_block, requester_space1, requester_space2, \
                  desired_block, owner_phone, owner_block, owner_space1, owner_space2, \
                  requester_confirmed, owner_confirmed, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(request.id.as_uuid())
        .bind(&request.requester_phone)
        .bind(&request.requester_block)
        .bind(request.requester_space1)
        .bind(request.requester_space2)
        .bind(&request.desired_block)
        .bind(&request.owner_phone)
        .bind(&request.owner_block)
        .bind(request.owner_space1)
        .bind(request.owner_space2)
        .bind(request.requester_confirmed)
        .bind(request.owner_confirmed)
        .bind(request.status.as_str())
        .bind(request.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_pending_by_block(
        &self,
        block: &str,
        exclude_phone: &str,
    ) -> Result<Vec<SwapRequest>, SwapError> {
        let rows = sqlx::query_as::<_, SwapRequestRow>(
            "SELECT id, requester_phone, requester_block, requester_space1, requester_space2, \
                    desired_block, owner_phone, owner_block, owner_space1, owner_space2, \
                    requester_confirmed, owner_confirmed, status, created_at \
             FROM swap_requests \
             WHERE status = 'pending' AND requester_block = $1 AND requester_phone <> $2 \
             ORDER BY created_at ASC",
        )
        .bind(block)
        .bind(exclude_phone)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SwapRequest::try_from).collect()
    }

    async fn get_request(&self, id: RequestId) -> Result<Option<SwapRequest>, SwapError> {
        let row = sqlx::query_as::<_, SwapRequestRow>(
            "SELECT id, requester_phone, requester_block, requester_space1, requester_space2, \
                    desired_block, owner_phone, owner_block, owner_space1, owner_space2, \
                    requester_confirmed, owner_confirmed, status, created_at \
             FROM swap_requests WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(SwapRequest::try_from).transpose()
    }

    async fn commit_match(
        &self,
        new_request: &SwapRequest,
        candidate: &SwapRequest,
    ) -> Result<bool, SwapError> {
        let mut tx = self.pool.begin().await?;

        // Claim the freshly inserted request with the candidate's snapshot.
        let claimed_new = sqlx::query(
            "UPDATE swap_requests SET \
                 owner_phone = $1, owner_block = $2, owner_space1 = $3, owner_space2 = $4, \
                 requester_confirmed = FALSE, owner_confirmed = FALSE, \
                 status = 'matched' \
             WHERE id = $5 AND status = 'pending'",
        )
        .bind(&candidate.requester_phone)
        .bind(&candidate.requester_block)
        .bind(candidate.requester_space1)
        .bind(candidate.requester_space2)
        .bind(new_request.id.as_uuid())
        .execute(&mut *tx)
        .await?;

        if claimed_new.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        // Claim the counterpart symmetrically; the `status = 'pending'`
        // guard loses cleanly to any concurrent registration that got
        // there first.
        let claimed_candidate = sqlx::query(
            "UPDATE swap_requests SET \
                 owner_phone = $1, owner_block = $2, owner_space1 = $3, owner_space2 = $4, \
                 requester_confirmed = FALSE, owner_confirmed = FALSE, \
                 status = 'matched' \
             WHERE id = $5 AND status = 'pending'",
        )
        .bind(&new_request.requester_phone)
        .bind(&new_request.requester_block)
        .bind(new_request.requester_space1)
        .bind(new_request.requester_space2)
        .bind(candidate.id.as_uuid())
        .execute(&mut *tx)
        .await?;

        if claimed_candidate.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn set_confirmed(
        &self,
        id: RequestId,
        role: PartyRole,
    ) -> Result<Option<SwapRequest>, SwapError> {
        let query = match role {
            PartyRole::Requester => {
                "UPDATE swap_requests SET requester_confirmed = TRUE WHERE id = $1 \
                 RETURNING id, requester_phone, requester_block, requester_space1, \
                           requester_space2, desired_block, owner_phone, owner_block, \
                           owner_space1, owner_space2, requester_confirmed, owner_confirmed, \
                           status, created_at"
            }
            PartyRole::Owner => {
                "UPDATE swap_requests SET owner_confirmed = TRUE WHERE id = $1 \
                 RETURNING id, requester_phone, requester_block, requester_space1, \
                           requester_space2, desired_block, owner_phone, owner_block, \
                           owner_space1, owner_space2, requester_confirmed, owner_confirmed, \
                           status, created_at"
            }
        };

        let row = sqlx::query_as::<_, SwapRequestRow>(query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(SwapRequest::try_from).transpose()
    }

    async fn delete_request(
        &self,
        id: RequestId,
        requester_phone: &str,
    ) -> Result<(), SwapError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, SwapRequestRow>(
            "SELECT id, requester_phone, requester_block, requester_space1, requester_space2, \
                    desired_block, owner_phone, owner_block, owner_space1, owner_space2, \
                    requester_confirmed, owner_confirmed, status, created_at \
             FROM swap_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(SwapError::Unauthorized);
        };
        if row.requester_phone != requester_phone {
            tx.rollback().await?;
            return Err(SwapError::Unauthorized);
        }

        // A matched counterpart goes back into the pending pool instead
        // of being stranded in a half-dead match.
        if row.status == "matched"
            && let Some(counterpart_phone) = &row.owner_phone
        {
            sqlx::query(
                "UPDATE swap_requests SET \
                     owner_phone = NULL, owner_block = NULL, \
                     owner_space1 = NULL, owner_space2 = NULL, \
                     requester_confirmed = FALSE, owner_confirmed = FALSE, \
                     status = 'pending' \
                 WHERE requester_phone = $1 AND owner_phone = $2 AND status = 'matched'",
            )
            .bind(counterpart_phone)
            .bind(&row.requester_phone)
            .execute(&mut *tx)
            .await?;
        }

        let deleted = sqlx::query("DELETE FROM swap_requests WHERE id = $1 AND requester_phone = $2")
            .bind(id.as_uuid())
            .bind(requester_phone)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() != 1 {
            tx.rollback().await?;
            return Err(SwapError::Unauthorized);
        }

        tx.commit().await?;
        Ok(())
    }

    async fn complete_swap(&self, request: &SwapRequest) -> Result<bool, SwapError> {
        let owner = request.owner_assignment().ok_or_else(|| {
            SwapError::Internal("completing a swap without an owner-side snapshot".to_string())
        })?;
        let requester = request.requester_assignment();

        let mut tx = self.pool.begin().await?;

        // Exactly-once gate: only the call that flips Matched -> Completed
        // carries out the assignment writes.
        let flipped = sqlx::query(
            "UPDATE swap_requests SET status = 'completed' \
             WHERE id = $1 AND status = 'matched' \
               AND requester_confirmed = TRUE AND owner_confirmed = TRUE",
        )
        .bind(request.id.as_uuid())
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        // Each side takes the other's pre-swap block and spaces.
        upsert_assignment(
            &mut *tx,
            &requester.phone_number,
            &owner.block_letter,
            owner.space_number1,
            owner.space_number2,
        )
        .await?;
        upsert_assignment(
            &mut *tx,
            &owner.phone_number,
            &requester.block_letter,
            requester.space_number1,
            requester.space_number2,
        )
        .await?;

        sqlx::query("DELETE FROM swap_requests WHERE id = $1")
            .bind(request.id.as_uuid())
            .execute(&mut *tx)
            .await?;

        // The counterpart's mirror record (where they are the requester)
        // describes the same pair; remove it so neither party is left with
        // a stale matched request after the swap.
        sqlx::query(
            "DELETE FROM swap_requests \
             WHERE requester_phone = $1 AND owner_phone = $2 AND status = 'matched'",
        )
        .bind(&owner.phone_number)
        .bind(&requester.phone_number)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn put_assignment(&self, assignment: &ParkingAssignment) -> Result<(), SwapError> {
        let mut conn = self.pool.acquire().await?;
        upsert_assignment(
            &mut *conn,
            &assignment.phone_number,
            &assignment.block_letter,
            assignment.space_number1,
            assignment.space_number2,
        )
        .await
    }

    async fn get_assignment(&self, phone: &str) -> Result<Option<ParkingAssignment>, SwapError> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            "SELECT phone_number, block_letter, space_number1, space_number2 \
             FROM parking_assignments WHERE phone_number = $1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ParkingAssignment::from))
    }
}
