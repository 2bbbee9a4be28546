//! Capabilities checked at the API boundary.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Permission {
    ManageCatalog,
    ManageInventory,
    ManagePets,
    ViewAllOrders,
    ViewAllAppointments,
    CancelAnyAppointment,
    ManageStaff,
    ViewLoginActivity,
    BlockUsers,
}

impl Permission {
    pub const ALL: [Permission; 9] = [
        Permission::ManageCatalog,
        Permission::ManageInventory,
        Permission::ManagePets,
        Permission::ViewAllOrders,
        Permission::ViewAllAppointments,
        Permission::CancelAnyAppointment,
        Permission::ManageStaff,
        Permission::ViewLoginActivity,
        Permission::BlockUsers,
    ];
}
