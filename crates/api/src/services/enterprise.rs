//! Enterprise membership service.
//!
//! Invitations are two-phase: inviting creates a DISABLED membership edge plus
//! a CONFIRMATION notification for the target user; accepting the notification
//! flips the edge to ENABLED through the confirmation dispatch table.

use std::sync::Arc;

use uuid::Uuid;

use domain::models::enterprise::{
    CreateEnterpriseRequest, Enterprise, EnterpriseMember, EnterpriseRole, InviteMemberRequest,
    MembershipStatus,
};
use domain::models::notification::{ActionTag, NewNotification, Notification, NotificationType};
use domain::models::user::Role;
use domain::services::access::{self, Permission};
use domain::services::confirmation::ConfirmationEffect;
use domain::DomainError;
use persistence::repositories::{EnterpriseRepository, NotificationRepository, UserRepository};

#[derive(Clone)]
pub struct EnterpriseService {
    enterprises: EnterpriseRepository,
    users: UserRepository,
    notifications: NotificationRepository,
}

impl EnterpriseService {
    pub fn new(
        enterprises: EnterpriseRepository,
        users: UserRepository,
        notifications: NotificationRepository,
    ) -> Self {
        Self {
            enterprises,
            users,
            notifications,
        }
    }

    /// Creates an enterprise and enrolls the creator as an enabled ADMIN.
    pub async fn create(
        &self,
        actor_id: Uuid,
        role: Role,
        request: CreateEnterpriseRequest,
    ) -> Result<Enterprise, DomainError> {
        if !access::has_permission(role, Permission::ManageEnterprises) {
            return Err(DomainError::Forbidden(
                "Only the platform owner can create enterprises".into(),
            ));
        }

        let entity = self.enterprises.insert(&request.name).await.map_err(|e| {
            let err = DomainError::from(e);
            match err {
                DomainError::Conflict(_) => {
                    DomainError::Conflict("Enterprise name already in use".into())
                }
                other => other,
            }
        })?;

        self.enterprises
            .add_member(
                entity.id,
                actor_id,
                EnterpriseRole::Admin.as_str(),
                MembershipStatus::Enabled.as_str(),
            )
            .await
            .map_err(DomainError::from)?;

        Ok(entity.into())
    }

    /// Fetches one enterprise visible to the actor.
    pub async fn get(
        &self,
        actor_id: Uuid,
        role: Role,
        enterprise_id: Uuid,
    ) -> Result<Enterprise, DomainError> {
        let enterprise = self.find_live(enterprise_id).await?;
        self.authorize_view(actor_id, role, enterprise_id).await?;
        Ok(enterprise)
    }

    /// Invites a user into the enterprise.
    ///
    /// The membership edge is created DISABLED; the invitation notification
    /// carries the ENTERPRISE_INVITATION tag so a later confirmation enables
    /// it.
    pub async fn invite(
        &self,
        actor_id: Uuid,
        role: Role,
        enterprise_id: Uuid,
        request: InviteMemberRequest,
    ) -> Result<EnterpriseMember, DomainError> {
        let enterprise = self.find_live(enterprise_id).await?;
        self.authorize_manage(actor_id, role, enterprise_id).await?;

        let target = self
            .users
            .find_by_id(request.user_id)
            .await
            .map_err(DomainError::from)?
            .ok_or_else(|| DomainError::NotFound("Invited user not found".into()))?;

        let member: EnterpriseMember = self
            .enterprises
            .add_member(
                enterprise_id,
                request.user_id,
                request.role.as_str(),
                MembershipStatus::Disabled.as_str(),
            )
            .await
            .map_err(|e| {
                let err = DomainError::from(e);
                match err {
                    DomainError::Conflict(_) => {
                        DomainError::Conflict("User is already a member of this enterprise".into())
                    }
                    other => other,
                }
            })?
            .try_into()?;

        self.notifications
            .insert(NewNotification {
                title: "Enterprise invitation".to_string(),
                message: format!("You were invited to join {}", enterprise.name),
                notification_type: NotificationType::Confirmation,
                action_tag: Some(ActionTag::EnterpriseInvitation),
                user_id: target.id,
                enterprise_id: Some(enterprise_id),
            })
            .await
            .map_err(DomainError::from)?;

        Ok(member)
    }

    /// Lists memberships of the enterprise.
    pub async fn members(
        &self,
        actor_id: Uuid,
        role: Role,
        enterprise_id: Uuid,
    ) -> Result<Vec<EnterpriseMember>, DomainError> {
        self.find_live(enterprise_id).await?;
        self.authorize_view(actor_id, role, enterprise_id).await?;

        self.enterprises
            .list_members(enterprise_id)
            .await
            .map_err(DomainError::from)?
            .into_iter()
            .map(EnterpriseMember::try_from)
            .collect()
    }

    async fn find_live(&self, enterprise_id: Uuid) -> Result<Enterprise, DomainError> {
        Ok(self
            .enterprises
            .find_by_id(enterprise_id)
            .await
            .map_err(DomainError::from)?
            .ok_or_else(|| DomainError::NotFound("Enterprise not found".into()))?
            .into())
    }

    /// Managing members requires the global enterprise permission or an
    /// enabled ADMIN membership in this enterprise.
    async fn authorize_manage(
        &self,
        actor_id: Uuid,
        role: Role,
        enterprise_id: Uuid,
    ) -> Result<(), DomainError> {
        if access::has_permission(role, Permission::ManageEnterprises) {
            return Ok(());
        }

        let membership = self
            .enterprises
            .find_membership(enterprise_id, actor_id)
            .await
            .map_err(DomainError::from)?;

        match membership {
            Some(m)
                if m.role == EnterpriseRole::Admin.as_str()
                    && m.status == MembershipStatus::Enabled.as_str() =>
            {
                Ok(())
            }
            _ => Err(DomainError::Forbidden(
                "You cannot manage members of this enterprise".into(),
            )),
        }
    }

    /// Viewing requires any enabled membership or the global permission.
    async fn authorize_view(
        &self,
        actor_id: Uuid,
        role: Role,
        enterprise_id: Uuid,
    ) -> Result<(), DomainError> {
        if access::has_permission(role, Permission::ManageEnterprises) {
            return Ok(());
        }

        let membership = self
            .enterprises
            .find_membership(enterprise_id, actor_id)
            .await
            .map_err(DomainError::from)?;

        match membership {
            Some(m) if m.status == MembershipStatus::Enabled.as_str() => Ok(()),
            _ => Err(DomainError::Forbidden(
                "You are not a member of this enterprise".into(),
            )),
        }
    }
}

/// Confirmation effect that enables the invited membership on acceptance.
///
/// A declined invitation leaves the edge DISABLED; the enterprise admin can
/// re-invite by other means if needed.
pub struct EnterpriseInvitationEffect {
    enterprises: EnterpriseRepository,
}

impl EnterpriseInvitationEffect {
    pub fn new(enterprises: EnterpriseRepository) -> Self {
        Self { enterprises }
    }
}

#[async_trait::async_trait]
impl ConfirmationEffect for EnterpriseInvitationEffect {
    async fn apply(&self, notification: &Notification, accepted: bool) -> Result<(), DomainError> {
        if !accepted {
            return Ok(());
        }

        let enterprise_id = notification.enterprise_id.ok_or_else(|| {
            DomainError::Internal("Invitation notification without enterprise id".into())
        })?;

        let affected = self
            .enterprises
            .set_membership_status(
                enterprise_id,
                notification.user_id,
                MembershipStatus::Enabled.as_str(),
            )
            .await
            .map_err(DomainError::from)?;

        if affected == 0 {
            return Err(DomainError::NotFound(
                "Invited membership no longer exists".into(),
            ));
        }

        tracing::info!(
            enterprise_id = %enterprise_id,
            user_id = %notification.user_id,
            "Enterprise invitation accepted"
        );
        Ok(())
    }
}

/// Wires the invitation effect into a dispatcher.
pub fn build_dispatcher(
    enterprises: EnterpriseRepository,
) -> domain::services::confirmation::ConfirmationDispatcher {
    domain::services::confirmation::ConfirmationDispatcher::new().register(
        ActionTag::EnterpriseInvitation,
        Arc::new(EnterpriseInvitationEffect::new(enterprises)),
    )
}
